//! Repository ports - Interfaces for aggregate persistence
//!
//! These traits define the contracts that infrastructure repositories must
//! implement. The orchestration engine depends on these traits, not on any
//! concrete storage backend.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::aggregates::{Project, Simulation, Team, Timeline};
use crate::domain::value_objects::{ProjectId, SimulationId, TeamId, TimelineId};

// =============================================================================
// Project Repository Port
// =============================================================================

/// Repository port for Project aggregate operations
#[async_trait]
pub trait ProjectRepositoryPort: Send + Sync {
    /// Persist a project (insert or replace)
    async fn save(&self, project: &Project) -> Result<()>;

    /// Get a project by ID
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>>;

    /// Delete a project
    async fn delete(&self, id: ProjectId) -> Result<bool>;
}

// =============================================================================
// Timeline Repository Port
// =============================================================================

/// Repository port for Timeline aggregate operations
#[async_trait]
pub trait TimelineRepositoryPort: Send + Sync {
    /// Persist a timeline (insert or replace)
    async fn save(&self, timeline: &Timeline) -> Result<()>;

    /// Get a timeline by ID
    async fn find_by_id(&self, id: TimelineId) -> Result<Option<Timeline>>;

    /// Get the timeline owned by a project
    async fn find_by_project_id(&self, project_id: ProjectId) -> Result<Option<Timeline>>;

    /// Delete a timeline
    async fn delete(&self, id: TimelineId) -> Result<bool>;
}

// =============================================================================
// Team Repository Port
// =============================================================================

/// Repository port for Team aggregate operations
#[async_trait]
pub trait TeamRepositoryPort: Send + Sync {
    /// Persist a team (insert or replace)
    async fn save(&self, team: &Team) -> Result<()>;

    /// Get a team by ID
    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>>;

    /// Get the team owned by a project
    async fn find_by_project_id(&self, project_id: ProjectId) -> Result<Option<Team>>;

    /// Delete a team
    async fn delete(&self, id: TeamId) -> Result<bool>;
}

// =============================================================================
// Simulation Repository Port
// =============================================================================

/// Repository port for Simulation aggregate operations
#[async_trait]
pub trait SimulationRepositoryPort: Send + Sync {
    /// Persist a simulation (insert or replace)
    async fn save(&self, simulation: &Simulation) -> Result<()>;

    /// Get a simulation by ID
    async fn find_by_id(&self, id: SimulationId) -> Result<Option<Simulation>>;

    /// List every simulation run for a project
    async fn find_by_project_id(&self, project_id: ProjectId) -> Result<Vec<Simulation>>;

    /// Delete a simulation
    async fn delete(&self, id: SimulationId) -> Result<bool>;
}
