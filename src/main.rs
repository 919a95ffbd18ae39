//! SimForge Engine - Backend service for simulating software project delivery
//!
//! The Engine is the backend server that:
//! - Models projects, timelines and teams as domain aggregates
//! - Drives simulation runs phase by phase
//! - Calls ecosystem services (document generators, analyzers) behind
//!   per-service circuit breakers
//! - Streams domain events to the ecosystem notification hub

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simforge_engine::infrastructure::config::AppConfig;
use simforge_engine::infrastructure::http;
use simforge_engine::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simforge_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SimForge Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    match &config.ecosystem_base_url {
        Some(url) => tracing::info!("  Ecosystem mesh: {}", url),
        None => tracing::info!("  Ecosystem mesh: local suite"),
    }
    match &config.event_stream_url {
        Some(url) => tracing::info!("  Event stream: {}", url),
        None => tracing::info!("  Event stream: logging only"),
    }

    let server_port = config.server_port;

    // Initialize application state
    let state = Arc::new(AppState::new(config)?);
    tracing::info!("Application state initialized");

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        // Merge REST API routes
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
