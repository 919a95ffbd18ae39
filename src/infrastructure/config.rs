//! Application configuration

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the ecosystem service mesh; when unset the engine runs
    /// against the built-in local generators
    pub ecosystem_base_url: Option<String>,
    /// URL of the ecosystem event stream; when unset events are logged only
    pub event_stream_url: Option<String>,
    /// How many events the bus keeps for inspection
    pub event_history_limit: usize,

    /// HTTP server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            ecosystem_base_url: env::var("ECOSYSTEM_BASE_URL").ok(),
            event_stream_url: env::var("EVENT_STREAM_URL").ok(),
            event_history_limit: env::var("EVENT_HISTORY_LIMIT")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("EVENT_HISTORY_LIMIT must be a number")?,

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}
