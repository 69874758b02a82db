// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Online greedy comment clustering.
//!
//! Comments arrive one at a time; each is normalized, embedded through a
//! pluggable provider, and either joined to the best matching cluster or made
//! the founder of a new one. Clusters keep an exact mean centroid and the
//! text of their founding comment. All state is process-resident.
//!
//! See [`AssignmentEngine`] for the admission algorithm and
//! [`SummaryService`] for the read-side projections.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::*;
pub use domain::*;
pub use error::{EngineError, EngineResult};
pub use infrastructure::*;
