//! Value objects - Immutable objects defined by their attributes

mod artifacts;
mod ids;
mod metrics;
mod project_profile;
mod service_catalog;
mod simulation_config;
mod team_dynamics;

pub use artifacts::{GeneratedDocument, WorkflowExecution, WorkflowKind};
pub use ids::*;
pub use metrics::{SimulationMetrics, SimulationResult};
pub use project_profile::{ComplexityLevel, ProjectType};
pub use service_catalog::{ecosystem_catalog, services, CriticalityTier, ServiceDescriptor};
pub use simulation_config::SimulationConfiguration;
pub use team_dynamics::{
    CommunicationStyle, ExpertiseLevel, TeamDynamics, WorkStyle,
};

pub(crate) use team_dynamics::clamp_score;
