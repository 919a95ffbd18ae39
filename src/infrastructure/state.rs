//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::{
    DocumentGenerationPort, EventSinkPort, WorkflowExecutionPort,
};
use crate::application::resilience::{CircuitBreakerRegistry, ResilientInvoker};
use crate::application::services::{DomainEventBus, ProjectSimulationService};
use crate::domain::value_objects::ecosystem_catalog;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::ecosystem::{
    EcosystemClient, HttpEventSink, LocalEcosystemSuite, LoggingEventSink,
};
use crate::infrastructure::persistence::{
    InMemoryProjectRepository, InMemorySimulationRepository, InMemoryTeamRepository,
    InMemoryTimelineRepository,
};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub breaker_registry: Arc<CircuitBreakerRegistry>,
    pub event_bus: Arc<DomainEventBus>,
    pub simulation_service: Arc<ProjectSimulationService>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        // Collaborators: the service mesh when configured, the local suite
        // otherwise.
        let (documents, workflows): (
            Arc<dyn DocumentGenerationPort>,
            Arc<dyn WorkflowExecutionPort>,
        ) = match &config.ecosystem_base_url {
            Some(base_url) => {
                let client = Arc::new(EcosystemClient::new(base_url));
                (client.clone(), client)
            }
            None => {
                let suite = Arc::new(LocalEcosystemSuite::new());
                (suite.clone(), suite)
            }
        };

        let sink: Arc<dyn EventSinkPort> = match &config.event_stream_url {
            Some(url) => Arc::new(HttpEventSink::new(url)),
            None => Arc::new(LoggingEventSink::new()),
        };

        let event_bus = Arc::new(DomainEventBus::with_history_limit(
            sink,
            config.event_history_limit,
        ));
        let breaker_registry = Arc::new(CircuitBreakerRegistry::from_catalog(ecosystem_catalog()));
        let invoker = Arc::new(ResilientInvoker::new(breaker_registry.clone()));

        let simulation_service = Arc::new(ProjectSimulationService::new(
            Arc::new(InMemoryProjectRepository::new()),
            Arc::new(InMemoryTimelineRepository::new()),
            Arc::new(InMemoryTeamRepository::new()),
            Arc::new(InMemorySimulationRepository::new()),
            documents,
            workflows,
            invoker,
            event_bus.clone(),
        ));

        Ok(Self {
            config,
            breaker_registry,
            event_bus,
            simulation_service,
        })
    }
}
