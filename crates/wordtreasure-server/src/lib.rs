//! WordTreasure Similarity Server
//!
//! HTTP surface for the similarity engine: wires the remote inference
//! providers to the engine, warms the models, and serves the scoring API.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{info, warn};
use wordtreasure_domain::WordPair;
use wordtreasure_engine::SimilarityEngine;
use wordtreasure_model::{NullCategoryProvider, RemoteEmbeddingProvider, RemoteEntailmentProvider};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Server configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ServerConfigError),

    /// Engine configuration invariant violated; fatal at startup
    #[error("Engine configuration error: {0}")]
    Engine(#[from] wordtreasure_engine::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the engine and shared state from configuration.
///
/// Fails fast on any configuration invariant violation.
pub fn build_state(config: ServerConfig) -> Result<AppState, ServerError> {
    let embedding = Arc::new(RemoteEmbeddingProvider::new(
        &config.inference_endpoint,
        config.embedding_dimension,
    ));
    let entailment = Arc::new(RemoteEntailmentProvider::new(&config.inference_endpoint));

    let engine = SimilarityEngine::new(
        config.engine.clone(),
        embedding,
        entailment,
        Arc::new(NullCategoryProvider),
    )?;

    Ok(AppState {
        engine: Arc::new(engine),
        settings: Arc::new(config),
    })
}

/// Start the similarity HTTP server
///
/// Initializes tracing, builds the engine, runs one warmup request through
/// the full pipeline, and serves until shutdown.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting WordTreasure similarity service");
    info!("Bind address: {}", config.bind_addr());
    info!("Inference endpoint: {}", config.inference_endpoint);

    let bind_addr = config.bind_addr();
    let state = build_state(config)?;

    warmup(&state).await;

    let app = create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Similarity service listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

/// One dummy request through the full pipeline so the first real request
/// does not pay the model cold-start cost. Failures are only warnings; the
/// sidecar may still be loading.
async fn warmup(state: &AppState) {
    let started = Instant::now();
    match state.engine.process(&WordPair::new("워밍업", "테스트")).await {
        Ok(_) => info!(
            "Warmup complete in {:.2}ms",
            started.elapsed().as_secs_f64() * 1000.0
        ),
        Err(e) => warn!("Warmup request failed (ignorable): {}", e),
    }
}
