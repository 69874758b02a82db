// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use thiserror::Error;

use crate::domain::cluster::ClusterId;
use crate::domain::comment::CommentId;
use crate::domain::embedding::EmbeddingError;

/// Errors returned by the clustering engine and its store.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Submitted text is empty or whitespace-only.
    #[error("comment text is empty")]
    EmptyText,

    /// The embedding provider failed or timed out; nothing was recorded.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(#[from] EmbeddingError),

    /// Lookup of an unknown cluster identity.
    #[error("cluster not found: {0}")]
    ClusterNotFound(ClusterId),

    /// Lookup of an unknown comment identity.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// A provider returned a vector of the wrong length.
    #[error("embedding dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Configured dimension.
        expected: usize,
        /// Length of the vector the provider returned.
        found: usize,
    },

    /// Attempt to assign a comment that already has a cluster reference.
    #[error("comment {0} is already assigned to a cluster")]
    AlreadyAssigned(CommentId),

    /// Invalid configuration value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },
}

/// Result type used by this crate.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
