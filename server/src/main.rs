// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Chorus Comment Clustering Service
//!
//! The `chorus` binary serves the online comment-clustering HTTP API.
//!
//! ## Architecture
//!
//! - **Engine**: `chorus-engine` owns all clustering semantics
//! - **Server**: this binary wires a cluster store, an embedding provider,
//!   and the HTTP boundary together, then runs until SIGINT/SIGTERM
//!
//! Comments are clustered one at a time as they arrive; see the engine crate
//! for the assignment semantics.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use chorus_engine::{
    application::{AssignmentEngine, EngineConfig, SummaryService},
    domain::EmbeddingProvider,
    infrastructure::{HashEmbedder, InMemoryClusterStore, OllamaEmbedder},
};

mod config;
mod routes;

use config::{ProviderKind, ServiceConfig};
use routes::AppState;

/// Chorus - online greedy comment clustering behind an HTTP API
#[derive(Parser)]
#[command(name = "chorus")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "CHORUS_CONFIG_PATH", value_name = "FILE")]
    config: Option<PathBuf>,

    /// HTTP API host (overrides the config file)
    #[arg(long, env = "CHORUS_HOST")]
    host: Option<String>,

    /// HTTP API port (overrides the config file)
    #[arg(long, env = "CHORUS_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CHORUS_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level)?;

    // Load configuration
    let config = ServiceConfig::load_or_default(cli.config)?;
    config
        .validate()
        .context("Configuration validation failed")?;

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);

    // Initialize services
    let provider = build_provider(&config);

    if let Err(e) = provider.health_check().await {
        warn!(
            "Embedding provider health check failed: {} - submissions will return 503 until it recovers",
            e
        );
    } else {
        info!("Embedding provider ready");
    }

    let store = Arc::new(InMemoryClusterStore::new());
    let engine_config = EngineConfig::default()
        .with_similarity_threshold(config.engine.similarity_threshold)
        .with_embedding_dimension(config.engine.embedding_dimension);
    let engine = Arc::new(AssignmentEngine::new(store.clone(), provider).with_config(engine_config));
    let summary = Arc::new(SummaryService::new(store, config.engine.similarity_threshold));

    info!(
        "Engine configured: threshold={}, dimension={}",
        config.engine.similarity_threshold, config.engine.embedding_dimension
    );

    let app_state = AppState {
        engine,
        summary,
        model_name: config.provider.reported_model(),
        start_time: std::time::Instant::now(),
    };

    // Build HTTP router
    let app = routes::router(app_state);

    // Start HTTP server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Chorus listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Chorus shutting down");

    Ok(())
}

/// Construct the embedding provider selected by the configuration
fn build_provider(config: &ServiceConfig) -> Arc<dyn EmbeddingProvider> {
    match config.provider.kind {
        ProviderKind::Ollama => {
            info!(
                "Initializing Ollama embedding provider: {} ({})",
                config.provider.model, config.provider.endpoint
            );
            Arc::new(OllamaEmbedder::new(
                config.provider.endpoint.clone(),
                config.provider.model.clone(),
                config.engine.embedding_dimension,
                Duration::from_secs(config.provider.timeout_secs),
            ))
        }
        ProviderKind::Hash => {
            warn!("Using deterministic hash embeddings - no semantic signal, demo/test use only");
            Arc::new(HashEmbedder::new(config.engine.embedding_dimension))
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
