//! Outbound ports - Interfaces that the application requires from external systems

mod collaborator_port;
mod event_sink_port;
mod repository_port;

pub use collaborator_port::{DocumentGenerationPort, WorkflowExecutionPort};
pub use event_sink_port::EventSinkPort;
pub use repository_port::{
    ProjectRepositoryPort, SimulationRepositoryPort, TeamRepositoryPort, TimelineRepositoryPort,
};
