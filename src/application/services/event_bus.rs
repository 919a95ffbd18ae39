//! Domain Event Bus - In-process pub/sub for domain events
//!
//! Aggregates buffer events; the orchestration engine drains them into this
//! bus. The bus delivers each event synchronously to every handler
//! registered for its type, then forwards it to the injected ecosystem sink.
//! A failing handler is logged and never stops delivery to the remaining
//! handlers or the sink.
//!
//! The bus keeps a bounded in-memory history for inspection by tests and
//! the status API. That history is not a durability guarantee; a restart
//! loses it.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::application::ports::outbound::EventSinkPort;
use crate::domain::events::DomainEvent;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A synchronous event handler; errors are logged, never propagated
pub type EventHandler = Arc<dyn Fn(&DomainEvent) -> anyhow::Result<()> + Send + Sync>;

/// In-process domain event bus
pub struct DomainEventBus {
    handlers: RwLock<HashMap<String, Vec<(HandlerId, EventHandler)>>>,
    history: Mutex<VecDeque<DomainEvent>>,
    history_limit: usize,
    sink: Arc<dyn EventSinkPort>,
    next_handler_id: AtomicU64,
}

impl DomainEventBus {
    const DEFAULT_HISTORY_LIMIT: usize = 1000;

    pub fn new(sink: Arc<dyn EventSinkPort>) -> Self {
        Self::with_history_limit(sink, Self::DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(sink: Arc<dyn EventSinkPort>, history_limit: usize) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            history: Mutex::new(VecDeque::new()),
            history_limit,
            sink,
            next_handler_id: AtomicU64::new(1),
        }
    }

    /// Register a handler for one event type
    pub fn subscribe(&self, event_type: impl Into<String>, handler: EventHandler) -> HandlerId {
        let id = HandlerId(self.next_handler_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write().unwrap_or_else(|p| p.into_inner());
        handlers.entry(event_type.into()).or_default().push((id, handler));
        id
    }

    /// Remove a handler; unknown ids are ignored
    pub fn unsubscribe(&self, id: HandlerId) {
        let mut handlers = self.handlers.write().unwrap_or_else(|p| p.into_inner());
        for registered in handlers.values_mut() {
            registered.retain(|(handler_id, _)| *handler_id != id);
        }
    }

    /// Deliver an event to local handlers, record it, and forward it to the
    /// ecosystem sink
    pub async fn publish(&self, event: DomainEvent) {
        let event_type = event.event_type();

        {
            let handlers = self.handlers.read().unwrap_or_else(|p| p.into_inner());
            if let Some(registered) = handlers.get(event_type) {
                for (id, handler) in registered {
                    if let Err(e) = handler(&event) {
                        tracing::error!(
                            event_type,
                            handler_id = id.0,
                            error = %e,
                            "event handler failed"
                        );
                    }
                }
            }
        }

        {
            let mut history = self.history.lock().unwrap_or_else(|p| p.into_inner());
            if history.len() >= self.history_limit {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        match serde_json::to_value(&event) {
            Ok(payload) => {
                if let Err(e) = self.sink.publish(payload).await {
                    tracing::warn!(event_type, error = %e, "ecosystem event sink rejected event");
                }
            }
            Err(e) => {
                tracing::error!(event_type, error = %e, "failed to serialize event for sink");
            }
        }
    }

    /// Every event published so far, oldest first (bounded by the history
    /// limit)
    pub fn published_events(&self) -> Vec<DomainEvent> {
        let history = self.history.lock().unwrap_or_else(|p| p.into_inner());
        history.iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        let mut history = self.history.lock().unwrap_or_else(|p| p.into_inner());
        history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::EventMetadata;
    use crate::domain::value_objects::{ProjectId, SimulationId};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct NullSink;

    #[async_trait]
    impl EventSinkPort for NullSink {
        async fn publish(&self, _event: serde_json::Value) -> Result<()> {
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl EventSinkPort for FailingSink {
        async fn publish(&self, _event: serde_json::Value) -> Result<()> {
            Err(anyhow::anyhow!("stream unavailable"))
        }
    }

    fn started_event() -> DomainEvent {
        DomainEvent::SimulationStarted {
            metadata: EventMetadata::default(),
            simulation_id: SimulationId::new(),
            project_id: ProjectId::new(),
        }
    }

    #[tokio::test]
    async fn publish_order_round_trips_through_history() {
        let bus = DomainEventBus::new(Arc::new(NullSink));
        let mut ids = Vec::new();
        for _ in 0..5 {
            let event = started_event();
            ids.push(event.metadata().event_id);
            bus.publish(event).await;
        }

        let published = bus.published_events();
        assert_eq!(published.len(), 5);
        let published_ids: Vec<_> = published.iter().map(|e| e.metadata().event_id).collect();
        assert_eq!(published_ids, ids);
    }

    #[tokio::test]
    async fn handlers_receive_matching_events_only() {
        let bus = DomainEventBus::new(Arc::new(NullSink));
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        bus.subscribe(
            "SimulationStarted",
            Arc::new(move |_| {
                seen_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        bus.publish(started_event()).await;
        bus.publish(DomainEvent::SimulationCancelled {
            metadata: EventMetadata::default(),
            simulation_id: SimulationId::new(),
        })
        .await;

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_handler_does_not_block_others_or_the_sink() {
        let bus = DomainEventBus::new(Arc::new(NullSink));
        let seen = Arc::new(AtomicUsize::new(0));

        bus.subscribe(
            "SimulationStarted",
            Arc::new(|_| Err(anyhow::anyhow!("handler broke"))),
        );
        let seen_clone = seen.clone();
        bus.subscribe(
            "SimulationStarted",
            Arc::new(move |_| {
                seen_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        bus.publish(started_event()).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(bus.published_events().len(), 1);
    }

    #[tokio::test]
    async fn sink_failure_is_not_fatal() {
        let bus = DomainEventBus::new(Arc::new(FailingSink));
        bus.publish(started_event()).await;
        assert_eq!(bus.published_events().len(), 1);
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery_and_is_idempotent() {
        let bus = DomainEventBus::new(Arc::new(NullSink));
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let id = bus.subscribe(
            "SimulationStarted",
            Arc::new(move |_| {
                seen_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        bus.publish(started_event()).await;
        bus.unsubscribe(id);
        bus.unsubscribe(id);
        bus.publish(started_event()).await;

        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let bus = DomainEventBus::with_history_limit(Arc::new(NullSink), 3);
        for _ in 0..5 {
            bus.publish(started_event()).await;
        }
        assert_eq!(bus.published_events().len(), 3);
    }
}
