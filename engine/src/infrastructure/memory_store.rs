// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! In-memory implementation of the cluster store.
//!
//! State is process-resident for the lifetime of the engine. A single
//! `RwLock` guards all records, so readers never observe a half-applied
//! membership change.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Cluster, ClusterId, Comment, CommentId};
use crate::error::{EngineError, EngineResult};
use crate::infrastructure::repository::ClusterStore;

#[derive(Default)]
struct StoreState {
    comments: HashMap<CommentId, Comment>,
    clusters: HashMap<ClusterId, Cluster>,
    /// Insertion sequences; enumeration accessors walk these so the order is
    /// creation order, not hash order.
    comment_order: Vec<CommentId>,
    cluster_order: Vec<ClusterId>,
}

/// In-memory `ClusterStore` backing the engine.
pub struct InMemoryClusterStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryClusterStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }
}

impl Default for InMemoryClusterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinate-wise mean of the given vectors.
fn mean_of(vectors: &[&[f32]]) -> Vec<f32> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let mut acc = vec![0.0f32; first.len()];
    for vector in vectors {
        for (slot, component) in acc.iter_mut().zip(vector.iter()) {
            *slot += component;
        }
    }
    let count = vectors.len() as f32;
    for slot in acc.iter_mut() {
        *slot /= count;
    }
    acc
}

#[async_trait]
impl ClusterStore for InMemoryClusterStore {
    async fn record_comment(
        &self,
        comment_id: CommentId,
        text: String,
        embedding: Vec<f32>,
        submitter_id: Option<String>,
    ) -> EngineResult<()> {
        let mut state = self.state.write().await;
        let comment = Comment::new(comment_id, text, embedding, submitter_id);
        state.comments.insert(comment_id, comment);
        state.comment_order.push(comment_id);
        Ok(())
    }

    async fn set_comment_cluster(
        &self,
        comment_id: CommentId,
        cluster_id: ClusterId,
    ) -> EngineResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        if !state.clusters.contains_key(&cluster_id) {
            return Err(EngineError::ClusterNotFound(cluster_id));
        }
        let comment = state
            .comments
            .get_mut(&comment_id)
            .ok_or(EngineError::CommentNotFound(comment_id))?;
        if comment.cluster_id.is_some() {
            return Err(EngineError::AlreadyAssigned(comment_id));
        }
        comment.cluster_id = Some(cluster_id);
        Ok(())
    }

    async fn create_cluster(
        &self,
        founding_comment_id: CommentId,
        founding_text: String,
        founding_embedding: Vec<f32>,
    ) -> EngineResult<ClusterId> {
        let mut state = self.state.write().await;
        if !state.comments.contains_key(&founding_comment_id) {
            return Err(EngineError::CommentNotFound(founding_comment_id));
        }
        let cluster = Cluster::found(founding_comment_id, founding_text, founding_embedding);
        let cluster_id = cluster.id;
        state.clusters.insert(cluster_id, cluster);
        state.cluster_order.push(cluster_id);
        Ok(cluster_id)
    }

    async fn add_member(
        &self,
        cluster_id: ClusterId,
        comment_id: CommentId,
        embedding: Vec<f32>,
    ) -> EngineResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let cluster = state
            .clusters
            .get_mut(&cluster_id)
            .ok_or(EngineError::ClusterNotFound(cluster_id))?;
        if embedding.len() != cluster.centroid.len() {
            return Err(EngineError::DimensionMismatch {
                expected: cluster.centroid.len(),
                found: embedding.len(),
            });
        }
        if !state.comments.contains_key(&comment_id) {
            return Err(EngineError::CommentNotFound(comment_id));
        }

        cluster.member_ids.push(comment_id);

        // Mean over the stored member embeddings, never an incremental
        // update, so the centroid cannot drift from accumulated rounding.
        let mut member_embeddings = Vec::with_capacity(cluster.member_ids.len());
        for member_id in &cluster.member_ids {
            let member = state
                .comments
                .get(member_id)
                .ok_or(EngineError::CommentNotFound(*member_id))?;
            member_embeddings.push(member.embedding.as_slice());
        }
        cluster.centroid = mean_of(&member_embeddings);
        cluster.updated_at = Utc::now();
        Ok(())
    }

    async fn find_cluster(&self, id: ClusterId) -> EngineResult<Option<Cluster>> {
        let state = self.state.read().await;
        Ok(state.clusters.get(&id).cloned())
    }

    async fn find_comment(&self, id: CommentId) -> EngineResult<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state.comments.get(&id).cloned())
    }

    async fn all_clusters(&self) -> EngineResult<Vec<Cluster>> {
        let state = self.state.read().await;
        Ok(state
            .cluster_order
            .iter()
            .filter_map(|id| state.clusters.get(id).cloned())
            .collect())
    }

    async fn all_comments(&self) -> EngineResult<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comment_order
            .iter()
            .filter_map(|id| state.comments.get(id).cloned())
            .collect())
    }

    async fn comment_count(&self) -> EngineResult<usize> {
        let state = self.state.read().await;
        Ok(state.comments.len())
    }

    async fn cluster_count(&self) -> EngineResult<usize> {
        let state = self.state.read().await;
        Ok(state.clusters.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn record(store: &InMemoryClusterStore, text: &str, embedding: Vec<f32>) -> CommentId {
        let id = CommentId::new();
        store
            .record_comment(id, text.to_string(), embedding, None)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_record_and_find_comment() {
        let store = InMemoryClusterStore::new();
        let id = record(&store, "the build is broken", vec![1.0, 0.0]).await;

        let found = store.find_comment(id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.text, "the build is broken");
        assert_eq!(found.embedding, vec![1.0, 0.0]);
        assert!(found.cluster_id.is_none());
    }

    #[tokio::test]
    async fn test_create_cluster_from_founder() {
        let store = InMemoryClusterStore::new();
        let founder = record(&store, "login page is down", vec![0.0, 1.0]).await;

        let cluster_id = store
            .create_cluster(founder, "login page is down".to_string(), vec![0.0, 1.0])
            .await
            .unwrap();

        let cluster = store.find_cluster(cluster_id).await.unwrap().unwrap();
        assert_eq!(cluster.member_ids, vec![founder]);
        assert_eq!(cluster.centroid, vec![0.0, 1.0]);
        assert_eq!(cluster.representative_text, "login page is down");
        assert_eq!(cluster.member_count(), 1);
    }

    #[tokio::test]
    async fn test_add_member_recomputes_centroid_as_mean() {
        let store = InMemoryClusterStore::new();
        let founder = record(&store, "a", vec![1.0, 0.0]).await;
        let cluster_id = store
            .create_cluster(founder, "a".to_string(), vec![1.0, 0.0])
            .await
            .unwrap();

        let second = record(&store, "b", vec![0.0, 1.0]).await;
        store
            .add_member(cluster_id, second, vec![0.0, 1.0])
            .await
            .unwrap();

        let cluster = store.find_cluster(cluster_id).await.unwrap().unwrap();
        assert_eq!(cluster.centroid, vec![0.5, 0.5]);
        assert_eq!(cluster.member_ids, vec![founder, second]);

        let third = record(&store, "c", vec![0.5, 0.5]).await;
        store
            .add_member(cluster_id, third, vec![0.5, 0.5])
            .await
            .unwrap();

        let cluster = store.find_cluster(cluster_id).await.unwrap().unwrap();
        assert_eq!(cluster.centroid, vec![0.5, 0.5]);
        assert_eq!(cluster.member_count(), 3);
    }

    #[tokio::test]
    async fn test_add_member_updates_timestamp() {
        let store = InMemoryClusterStore::new();
        let founder = record(&store, "a", vec![1.0]).await;
        let cluster_id = store
            .create_cluster(founder, "a".to_string(), vec![1.0])
            .await
            .unwrap();
        let created = store
            .find_cluster(cluster_id)
            .await
            .unwrap()
            .unwrap()
            .created_at;

        let second = record(&store, "b", vec![3.0]).await;
        store.add_member(cluster_id, second, vec![3.0]).await.unwrap();

        let cluster = store.find_cluster(cluster_id).await.unwrap().unwrap();
        assert_eq!(cluster.created_at, created);
        assert!(cluster.updated_at >= created);
        assert_eq!(cluster.centroid, vec![2.0]);
    }

    #[tokio::test]
    async fn test_set_comment_cluster_exactly_once() {
        let store = InMemoryClusterStore::new();
        let founder = record(&store, "a", vec![1.0]).await;
        let cluster_id = store
            .create_cluster(founder, "a".to_string(), vec![1.0])
            .await
            .unwrap();

        store.set_comment_cluster(founder, cluster_id).await.unwrap();
        let comment = store.find_comment(founder).await.unwrap().unwrap();
        assert_eq!(comment.cluster_id, Some(cluster_id));

        let err = store
            .set_comment_cluster(founder, cluster_id)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AlreadyAssigned(id) if id == founder));
    }

    #[tokio::test]
    async fn test_unknown_ids_fail_with_not_found() {
        let store = InMemoryClusterStore::new();
        let ghost_comment = CommentId::new();
        let ghost_cluster = ClusterId::new();

        let err = store
            .create_cluster(ghost_comment, "x".to_string(), vec![1.0])
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::CommentNotFound(_)));

        let err = store
            .add_member(ghost_cluster, ghost_comment, vec![1.0])
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::ClusterNotFound(_)));

        let err = store
            .set_comment_cluster(ghost_comment, ghost_cluster)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::ClusterNotFound(_)));

        assert!(store.find_cluster(ghost_cluster).await.unwrap().is_none());
        assert!(store.find_comment(ghost_comment).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_member_rejects_wrong_dimension() {
        let store = InMemoryClusterStore::new();
        let founder = record(&store, "a", vec![1.0, 0.0]).await;
        let cluster_id = store
            .create_cluster(founder, "a".to_string(), vec![1.0, 0.0])
            .await
            .unwrap();

        let second = record(&store, "b", vec![1.0, 0.0, 0.0]).await;
        let err = store
            .add_member(cluster_id, second, vec![1.0, 0.0, 0.0])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        ));

        // Membership and centroid are untouched by the failed call.
        let cluster = store.find_cluster(cluster_id).await.unwrap().unwrap();
        assert_eq!(cluster.member_ids, vec![founder]);
        assert_eq!(cluster.centroid, vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_enumeration_is_creation_order() {
        let store = InMemoryClusterStore::new();
        let mut expected = Vec::new();
        for i in 0..5 {
            let text = format!("comment {i}");
            let comment = record(&store, &text, vec![i as f32, 1.0]).await;
            let cluster = store
                .create_cluster(comment, text, vec![i as f32, 1.0])
                .await
                .unwrap();
            expected.push(cluster);
        }

        let listed: Vec<ClusterId> = store
            .all_clusters()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(listed, expected);

        assert_eq!(store.cluster_count().await.unwrap(), 5);
        assert_eq!(store.comment_count().await.unwrap(), 5);
    }

    #[test]
    fn test_mean_of_empty_input() {
        assert!(mean_of(&[]).is_empty());
    }
}
