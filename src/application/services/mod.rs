//! Application services - Use case implementations
//!
//! The simulation service is the orchestration engine: it builds the four
//! aggregates from a creation request and drives runs through their phases,
//! talking to ecosystem services only through the resilient invoker.

pub mod event_bus;
pub mod phase_templates;
pub mod simulation_service;

pub use event_bus::{DomainEventBus, EventHandler, HandlerId};
pub use phase_templates::{
    default_phase_templates, project_phases_from_templates, timeline_phases_for, PhaseTemplate,
};
pub use simulation_service::{
    CreateSimulationRequest, ExecutionError, ExecutionReport, PhaseSpec, ProjectSimulationService,
    ResultSummary, SimulationServiceError, SimulationStatusView, TeamMemberSpec,
};
