// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Deterministic hash-based embedding provider.
//!
//! Offline stand-in for a real model server: expands a SHA-256 digest of the
//! text into a unit vector of the configured dimension. Identical texts embed
//! identically; unrelated texts land near-orthogonal in high dimensions, so
//! they fall well below any useful similarity threshold. No semantic signal,
//! which is exactly what tests and provider-less demos need.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::embedding::{EmbeddingError, EmbeddingProvider};

pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let seed = Sha256::digest(text.as_bytes());

        // Re-hash the seed with a block counter until the vector is full,
        // taking eight f32 components per 32-byte block.
        let mut components = Vec::with_capacity(self.dimension);
        let mut block_index: u32 = 0;
        while components.len() < self.dimension {
            let mut hasher = Sha256::new();
            hasher.update(seed);
            hasher.update(block_index.to_le_bytes());
            let block = hasher.finalize();
            for chunk in block.chunks_exact(4) {
                if components.len() == self.dimension {
                    break;
                }
                let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                components.push(raw as f32 / u32::MAX as f32 - 0.5);
            }
            block_index += 1;
        }

        let norm = components.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for component in components.iter_mut() {
                *component /= norm;
            }
        }
        components
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vector_for(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn health_check(&self) -> Result<(), EmbeddingError> {
        Ok(())
    }
}
