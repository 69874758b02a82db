// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Read-only projections of the cluster store for reporting.
//!
//! Nothing here mutates state; the boundary can serve summaries at any time,
//! including while a submission is mid-flight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{Cluster, ClusterId, CommentId};
use crate::error::{EngineError, EngineResult};
use crate::infrastructure::ClusterStore;

/// One comment as rendered inside a cluster summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
}

/// One cluster with its member comments in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: ClusterId,
    pub comment_count: usize,
    pub representative_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<CommentView>,
}

/// Aggregate counters plus the configured threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub total_comments: usize,
    pub total_clusters: usize,
    pub similarity_threshold: f32,
    pub avg_cluster_size: f32,
}

/// Query service over the cluster store.
pub struct SummaryService {
    store: Arc<dyn ClusterStore>,
    similarity_threshold: f32,
}

impl SummaryService {
    pub fn new(store: Arc<dyn ClusterStore>, similarity_threshold: f32) -> Self {
        Self {
            store,
            similarity_threshold,
        }
    }

    /// All clusters, largest first. The sort is stable over the store's
    /// creation-order enumeration, so equal-sized clusters keep a
    /// deterministic order across calls.
    pub async fn list_clusters(&self) -> EngineResult<Vec<ClusterSummary>> {
        let clusters = self.store.all_clusters().await?;
        let mut summaries = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            summaries.push(self.project(cluster).await?);
        }
        summaries.sort_by(|a, b| b.comment_count.cmp(&a.comment_count));
        Ok(summaries)
    }

    /// One cluster by id.
    pub async fn get_cluster(&self, id: ClusterId) -> EngineResult<ClusterSummary> {
        let cluster = self
            .store
            .find_cluster(id)
            .await?
            .ok_or(EngineError::ClusterNotFound(id))?;
        self.project(cluster).await
    }

    pub async fn stats(&self) -> EngineResult<EngineStats> {
        let total_comments = self.store.comment_count().await?;
        let total_clusters = self.store.cluster_count().await?;
        let avg_cluster_size = total_comments as f32 / total_clusters.max(1) as f32;
        Ok(EngineStats {
            total_comments,
            total_clusters,
            similarity_threshold: self.similarity_threshold,
            avg_cluster_size,
        })
    }

    async fn project(&self, cluster: Cluster) -> EngineResult<ClusterSummary> {
        let mut comments = Vec::with_capacity(cluster.member_ids.len());
        for comment_id in &cluster.member_ids {
            let comment = self
                .store
                .find_comment(*comment_id)
                .await?
                .ok_or(EngineError::CommentNotFound(*comment_id))?;
            comments.push(CommentView {
                id: comment.id,
                text: comment.text,
                timestamp: comment.created_at,
                user_id: comment.submitter_id,
            });
        }
        Ok(ClusterSummary {
            cluster_id: cluster.id,
            comment_count: cluster.member_ids.len(),
            representative_text: cluster.representative_text,
            created_at: cluster.created_at,
            updated_at: cluster.updated_at,
            comments,
        })
    }
}
