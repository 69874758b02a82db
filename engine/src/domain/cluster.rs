// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::comment::CommentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub Uuid);

impl ClusterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClusterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A semantic group of comments.
///
/// Membership is append-only in arrival order. The centroid is the
/// coordinate-wise mean of the members' embeddings and is recomputed by the
/// store on every membership change. The representative text is the founding
/// comment's text and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub member_ids: Vec<CommentId>,
    pub centroid: Vec<f32>,
    pub representative_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cluster {
    /// Create a cluster founded by a single comment. The centroid of a
    /// one-member cluster is that member's embedding.
    pub fn found(
        founding_comment_id: CommentId,
        founding_text: String,
        founding_embedding: Vec<f32>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ClusterId::new(),
            member_ids: vec![founding_comment_id],
            centroid: founding_embedding,
            representative_text: founding_text,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }
}
