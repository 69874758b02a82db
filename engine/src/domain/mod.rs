// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Domain layer: entities, normalization, similarity, and the embedding seam.

pub mod cluster;
pub mod comment;
pub mod embedding;
pub mod normalize;
pub mod similarity;

pub use cluster::{Cluster, ClusterId};
pub use comment::{Comment, CommentId};
pub use embedding::{EmbeddingError, EmbeddingProvider};
pub use normalize::normalize;
pub use similarity::cosine_similarity;
