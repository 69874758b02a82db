// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::cluster::ClusterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single submitted comment.
///
/// The text and embedding are immutable once recorded; the cluster reference
/// starts unset and is assigned exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Original text as submitted, before normalization.
    pub text: String,
    /// Embedding of the normalized text, fixed dimension for the process.
    pub embedding: Vec<f32>,
    pub submitter_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub cluster_id: Option<ClusterId>,
}

impl Comment {
    pub fn new(
        id: CommentId,
        text: String,
        embedding: Vec<f32>,
        submitter_id: Option<String>,
    ) -> Self {
        Self {
            id,
            text,
            embedding,
            submitter_id,
            created_at: Utc::now(),
            cluster_id: None,
        }
    }
}
