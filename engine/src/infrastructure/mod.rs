// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer: storage and embedding provider implementations.

pub mod hash_embedder;
pub mod memory_store;
pub mod ollama;
pub mod repository;

pub use hash_embedder::HashEmbedder;
pub use memory_store::InMemoryClusterStore;
pub use ollama::OllamaEmbedder;
pub use repository::ClusterStore;
