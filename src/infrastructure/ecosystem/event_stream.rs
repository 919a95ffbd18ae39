//! Event sink adapters
//!
//! The bus forwards every published domain event to one of these sinks.
//! The HTTP sink streams to the notification hub; the logging sink is the
//! fallback when no stream URL is configured.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::outbound::EventSinkPort;

/// Streams domain events to the ecosystem notification hub
pub struct HttpEventSink {
    client: Client,
    endpoint: String,
}

impl HttpEventSink {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EventSinkPort for HttpEventSink {
    async fn publish(&self, event: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/events", self.endpoint))
            .json(&event)
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("event stream returned {}", response.status());
        }
        Ok(())
    }
}

/// Logs domain events instead of streaming them
#[derive(Default)]
pub struct LoggingEventSink;

impl LoggingEventSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSinkPort for LoggingEventSink {
    async fn publish(&self, event: serde_json::Value) -> Result<()> {
        let event_type = event
            .get("event_type")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        tracing::debug!(event_type, payload = %event, "domain event");
        Ok(())
    }
}
