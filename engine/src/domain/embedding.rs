// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Embedding Provider Domain Interface (Anti-Corruption Layer)
//
// Defines the domain interface for text embedding providers.
// Prevents vendor lock-in by abstracting the model server API.
//
// Implementations in infrastructure/ directory.

use async_trait::async_trait;

/// Domain interface for embedding providers.
///
/// The engine depends on this and nothing else about the model: text in,
/// fixed-length vector out. Providers must be deterministic for identical
/// normalized input, and the dimension must stay fixed for the process
/// lifetime.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a normalized text into a vector of `dimension()` components.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// The fixed output dimension of this provider.
    fn dimension(&self) -> usize;

    /// Check if the provider is reachable and ready to serve embeddings.
    async fn health_check(&self) -> Result<(), EmbeddingError>;
}

/// Errors that can occur while obtaining an embedding
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),
}
