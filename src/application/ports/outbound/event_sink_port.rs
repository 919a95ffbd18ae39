//! Event sink port - Interface for ecosystem-wide event streaming
//!
//! The domain event bus forwards every published event here after local
//! delivery. Sink failures are logged by the bus and never fail a
//! simulation.

use anyhow::Result;
use async_trait::async_trait;

/// Port for forwarding domain events to the ecosystem
#[async_trait]
pub trait EventSinkPort: Send + Sync {
    /// Publish a serialized domain event
    async fn publish(&self, event: serde_json::Value) -> Result<()>;
}
