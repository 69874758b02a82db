// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Storage interface for the clustering engine
//! Defines the contract for comment and cluster records

use async_trait::async_trait;

use crate::domain::{Cluster, ClusterId, Comment, CommentId};
use crate::error::EngineResult;

/// Owner of all Comment and Cluster records.
///
/// Every mutation of cluster membership and centroids goes through this
/// contract; nothing outside the store touches the records. Enumeration
/// order is creation order, so scans over `all_clusters` are stable across
/// calls and across runs.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Store a new comment record with its cluster reference unset
    async fn record_comment(
        &self,
        comment_id: CommentId,
        text: String,
        embedding: Vec<f32>,
        submitter_id: Option<String>,
    ) -> EngineResult<()>;

    /// Set a comment's cluster reference; callable exactly once per comment
    async fn set_comment_cluster(
        &self,
        comment_id: CommentId,
        cluster_id: ClusterId,
    ) -> EngineResult<()>;

    /// Create a cluster founded by a recorded comment; centroid starts as the
    /// founding embedding and the representative text never changes afterwards
    async fn create_cluster(
        &self,
        founding_comment_id: CommentId,
        founding_text: String,
        founding_embedding: Vec<f32>,
    ) -> EngineResult<ClusterId>;

    /// Append a recorded comment to a cluster's membership and recompute the
    /// centroid as the coordinate-wise mean over the stored member embeddings
    async fn add_member(
        &self,
        cluster_id: ClusterId,
        comment_id: CommentId,
        embedding: Vec<f32>,
    ) -> EngineResult<()>;

    /// Find a cluster by its ID
    async fn find_cluster(&self, id: ClusterId) -> EngineResult<Option<Cluster>>;

    /// Find a comment by its ID
    async fn find_comment(&self, id: CommentId) -> EngineResult<Option<Comment>>;

    /// All clusters in creation order
    async fn all_clusters(&self) -> EngineResult<Vec<Cluster>>;

    /// All comments in creation order
    async fn all_comments(&self) -> EngineResult<Vec<Comment>>;

    /// Number of stored comments
    async fn comment_count(&self) -> EngineResult<usize>;

    /// Number of stored clusters
    async fn cluster_count(&self) -> EngineResult<usize>;
}
