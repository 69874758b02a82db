// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Application layer: the assignment engine and read-side summaries.

pub mod assignment;
pub mod summary;

pub use assignment::{
    AssignmentEngine, AssignmentOutcome, EngineConfig, DEFAULT_EMBEDDING_DIMENSION,
    DEFAULT_SIMILARITY_THRESHOLD,
};
pub use summary::{ClusterSummary, CommentView, EngineStats, SummaryService};
