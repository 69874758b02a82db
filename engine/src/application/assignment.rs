// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # AssignmentEngine — Online Greedy Clustering
//!
//! Application service that assigns each incoming comment to a semantic
//! cluster, one comment at a time, with no re-clustering and no backtracking.
//!
//! ## Eligibility & Selection
//!
//! A cluster is an eligible candidate when the cosine similarity between the
//! new comment's embedding and the cluster centroid is at or above
//! `similarity_threshold` (default 0.65; exactly-equal is eligible). Among
//! eligible candidates the engine picks the highest *effective similarity*:
//! the maximum of the centroid similarity and the similarity to a freshly
//! re-embedded copy of the cluster's representative text. Ties go to the
//! first candidate in cluster creation order.
//!
//! ## Re-embedding
//!
//! The representative text is re-embedded on every comparison instead of
//! caching the founder's vector. Admission therefore tracks the *current*
//! provider, not whatever model version happened to embed the founder, at the
//! cost of extra provider calls per eligible candidate.
//!
//! ## Write ordering
//!
//! The candidate scan performs no store mutation. The comment record, the
//! membership change, and the cluster reference are written only after the
//! scan has fully succeeded, so a provider failure mid-scan leaves no
//! orphaned records behind.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use serde::{Deserialize, Serialize};

use crate::domain::{cosine_similarity, normalize, ClusterId, CommentId, EmbeddingProvider};
use crate::error::{EngineError, EngineResult};
use crate::infrastructure::ClusterStore;

/// Similarity threshold used when none is configured.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.65;

/// Embedding dimension used when none is configured.
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 768;

/// Process-wide engine configuration, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Minimum centroid similarity for a cluster to be considered at all.
    pub similarity_threshold: f32,
    /// Expected length of every provider-returned vector.
    pub embedding_dimension: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

impl EngineConfig {
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_embedding_dimension(mut self, dimension: usize) -> Self {
        self.embedding_dimension = dimension;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(EngineError::InvalidParameter {
                name: "similarity_threshold",
                message: "must be within [0.0, 1.0]",
            });
        }
        if self.embedding_dimension == 0 {
            return Err(EngineError::InvalidParameter {
                name: "embedding_dimension",
                message: "must be greater than zero",
            });
        }
        Ok(())
    }
}

/// Result of processing one comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub comment_id: CommentId,
    pub cluster_id: ClusterId,
    /// Winning effective similarity, or 0.0 when a new cluster was founded.
    pub similarity: f32,
    pub is_new_cluster: bool,
}

/// Best eligible candidate found during the scan.
struct Candidate {
    cluster_id: ClusterId,
    effective_similarity: f32,
}

/// Online greedy clustering engine.
pub struct AssignmentEngine {
    store: Arc<dyn ClusterStore>,
    provider: Arc<dyn EmbeddingProvider>,
    config: EngineConfig,
    /// Serializes `process` end to end: the candidate scan followed by the
    /// store writes is a read-then-write sequence that must never interleave.
    process_lock: Mutex<()>,
}

impl AssignmentEngine {
    pub fn new(store: Arc<dyn ClusterStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            provider,
            config: EngineConfig::default(),
            process_lock: Mutex::new(()),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn similarity_threshold(&self) -> f32 {
        self.config.similarity_threshold
    }

    pub fn embedding_dimension(&self) -> usize {
        self.config.embedding_dimension
    }

    fn check_dimension(&self, embedding: &[f32]) -> EngineResult<()> {
        if embedding.len() != self.config.embedding_dimension {
            return Err(EngineError::DimensionMismatch {
                expected: self.config.embedding_dimension,
                found: embedding.len(),
            });
        }
        Ok(())
    }

    /// Assign one comment to the best matching cluster, founding a new
    /// cluster when no candidate reaches the threshold.
    pub async fn process(
        &self,
        text: &str,
        submitter_id: Option<String>,
    ) -> EngineResult<AssignmentOutcome> {
        let _serialized = self.process_lock.lock().await;

        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(EngineError::EmptyText);
        }

        let embedding = self.provider.embed(&normalized).await?;
        self.check_dimension(&embedding)?;

        let comment_id = CommentId::new();
        let best = self.scan_candidates(&embedding).await?;

        match best {
            Some(candidate) => {
                self.store
                    .record_comment(comment_id, text.to_string(), embedding.clone(), submitter_id)
                    .await?;
                self.store
                    .add_member(candidate.cluster_id, comment_id, embedding)
                    .await?;
                self.store
                    .set_comment_cluster(comment_id, candidate.cluster_id)
                    .await?;

                info!(
                    "Assigned comment {} to cluster {} (similarity: {:.3})",
                    comment_id, candidate.cluster_id, candidate.effective_similarity
                );
                Ok(AssignmentOutcome {
                    comment_id,
                    cluster_id: candidate.cluster_id,
                    similarity: candidate.effective_similarity,
                    is_new_cluster: false,
                })
            }
            None => {
                self.store
                    .record_comment(comment_id, text.to_string(), embedding.clone(), submitter_id)
                    .await?;
                let cluster_id = self
                    .store
                    .create_cluster(comment_id, text.to_string(), embedding)
                    .await?;
                self.store.set_comment_cluster(comment_id, cluster_id).await?;

                info!("Created new cluster {} for comment {}", cluster_id, comment_id);
                Ok(AssignmentOutcome {
                    comment_id,
                    cluster_id,
                    similarity: 0.0,
                    is_new_cluster: true,
                })
            }
        }
    }

    /// Scan every cluster in creation order and return the best eligible
    /// candidate, if any. Read-only: no store mutation happens here.
    async fn scan_candidates(&self, embedding: &[f32]) -> EngineResult<Option<Candidate>> {
        let clusters = self.store.all_clusters().await?;
        let mut best: Option<Candidate> = None;

        for cluster in &clusters {
            let centroid_similarity = cosine_similarity(embedding, &cluster.centroid);
            if centroid_similarity < self.config.similarity_threshold {
                continue;
            }

            // Eligible: refine with a fresh embedding of the representative
            // text and keep whichever similarity is higher.
            let representative = self
                .provider
                .embed(&normalize(&cluster.representative_text))
                .await?;
            self.check_dimension(&representative)?;
            let representative_similarity = cosine_similarity(embedding, &representative);
            let effective_similarity = centroid_similarity.max(representative_similarity);

            debug!(
                "Cluster {} eligible: centroid {:.3}, representative {:.3}",
                cluster.id, centroid_similarity, representative_similarity
            );

            let improves = best
                .as_ref()
                .map_or(true, |current| effective_similarity > current.effective_similarity);
            if improves {
                best = Some(Candidate {
                    cluster_id: cluster.id,
                    effective_similarity,
                });
            }
        }

        Ok(best)
    }
}
