// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Service Configuration Types
//
// Defines the YAML configuration schema for the Chorus service, including:
// - HTTP bind address and port
// - Clustering engine tuning (similarity threshold, embedding dimension)
// - Embedding provider selection (Ollama, or the deterministic hash
//   fallback for provider-less deployments)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chorus_engine::{DEFAULT_EMBEDDING_DIMENSION, DEFAULT_SIMILARITY_THRESHOLD};

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: HttpConfig,

    /// Clustering engine configuration
    #[serde(default)]
    pub engine: ClusteringConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub provider: EmbeddingProviderConfig,
}

/// HTTP bind configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP API port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Clustering engine tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Minimum cosine similarity for a comment to join an existing cluster
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Expected length of every provider-returned embedding vector
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingProviderConfig {
    /// Provider kind
    #[serde(default)]
    pub kind: ProviderKind,

    /// Model server endpoint URL (Ollama only)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Embedding model identifier (Ollama only)
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    Hash,
}

impl EmbeddingProviderConfig {
    /// Model name echoed by the settings and health endpoints.
    pub fn reported_model(&self) -> String {
        match self.kind {
            ProviderKind::Ollama => self.model.clone(),
            ProviderKind::Hash => "deterministic-hash".to_string(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_similarity_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_embedding_dimension() -> usize {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Ollama
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            embedding_dimension: default_embedding_dimension(),
        }
    }
}

impl Default for EmbeddingProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: HttpConfig::default(),
            engine: ClusteringConfig::default(),
            provider: EmbeddingProviderConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration from an explicit path, falling back to built-in
    /// defaults when none is given
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match cli_path {
            Some(path) => {
                tracing::info!("Loading configuration from {:?}", path);
                Self::from_yaml_file(&path).map_err(|e| {
                    anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
                })
            }
            None => {
                tracing::info!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port cannot be 0");
        }

        if !(0.0..=1.0).contains(&self.engine.similarity_threshold) {
            anyhow::bail!(
                "engine.similarity_threshold must be within [0.0, 1.0], got {}",
                self.engine.similarity_threshold
            );
        }

        if self.engine.embedding_dimension == 0 {
            anyhow::bail!("engine.embedding_dimension cannot be 0");
        }

        if self.provider.kind == ProviderKind::Ollama {
            if self.provider.endpoint.is_empty() {
                anyhow::bail!("provider.endpoint cannot be empty for the ollama provider");
            }

            if self.provider.model.is_empty() {
                anyhow::bail!("provider.model cannot be empty for the ollama provider");
            }

            if self.provider.timeout_secs == 0 {
                anyhow::bail!("provider.timeout_secs cannot be 0");
            }
        }

        Ok(())
    }
}
