//! In-memory repository adapters
//!
//! Process-local storage for the four aggregate repositories. Each adapter
//! keeps a clone of the aggregate behind an async RwLock; `save` is an
//! insert-or-replace. Used for tests and for deployments without a
//! persistence backend.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    ProjectRepositoryPort, SimulationRepositoryPort, TeamRepositoryPort, TimelineRepositoryPort,
};
use crate::domain::aggregates::{Project, Simulation, Team, Timeline};
use crate::domain::value_objects::{ProjectId, SimulationId, TeamId, TimelineId};

// =============================================================================
// Project Repository
// =============================================================================

#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepositoryPort for InMemoryProjectRepository {
    async fn save(&self, project: &Project) -> Result<()> {
        self.projects
            .write()
            .await
            .insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: ProjectId) -> Result<bool> {
        Ok(self.projects.write().await.remove(&id).is_some())
    }
}

// =============================================================================
// Timeline Repository
// =============================================================================

#[derive(Default)]
pub struct InMemoryTimelineRepository {
    timelines: RwLock<HashMap<TimelineId, Timeline>>,
}

impl InMemoryTimelineRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimelineRepositoryPort for InMemoryTimelineRepository {
    async fn save(&self, timeline: &Timeline) -> Result<()> {
        self.timelines
            .write()
            .await
            .insert(timeline.id(), timeline.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TimelineId) -> Result<Option<Timeline>> {
        Ok(self.timelines.read().await.get(&id).cloned())
    }

    async fn find_by_project_id(&self, project_id: ProjectId) -> Result<Option<Timeline>> {
        Ok(self
            .timelines
            .read()
            .await
            .values()
            .find(|t| t.project_id() == project_id)
            .cloned())
    }

    async fn delete(&self, id: TimelineId) -> Result<bool> {
        Ok(self.timelines.write().await.remove(&id).is_some())
    }
}

// =============================================================================
// Team Repository
// =============================================================================

#[derive(Default)]
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<TeamId, Team>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepositoryPort for InMemoryTeamRepository {
    async fn save(&self, team: &Team) -> Result<()> {
        self.teams.write().await.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>> {
        Ok(self.teams.read().await.get(&id).cloned())
    }

    async fn find_by_project_id(&self, project_id: ProjectId) -> Result<Option<Team>> {
        Ok(self
            .teams
            .read()
            .await
            .values()
            .find(|t| t.project_id() == project_id)
            .cloned())
    }

    async fn delete(&self, id: TeamId) -> Result<bool> {
        Ok(self.teams.write().await.remove(&id).is_some())
    }
}

// =============================================================================
// Simulation Repository
// =============================================================================

#[derive(Default)]
pub struct InMemorySimulationRepository {
    simulations: RwLock<HashMap<SimulationId, Simulation>>,
}

impl InMemorySimulationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SimulationRepositoryPort for InMemorySimulationRepository {
    async fn save(&self, simulation: &Simulation) -> Result<()> {
        self.simulations
            .write()
            .await
            .insert(simulation.id(), simulation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: SimulationId) -> Result<Option<Simulation>> {
        Ok(self.simulations.read().await.get(&id).cloned())
    }

    async fn find_by_project_id(&self, project_id: ProjectId) -> Result<Vec<Simulation>> {
        Ok(self
            .simulations
            .read()
            .await
            .values()
            .filter(|s| s.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: SimulationId) -> Result<bool> {
        Ok(self.simulations.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ComplexityLevel, ProjectType, SimulationConfiguration};

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let repo = InMemoryProjectRepository::new();
        let project = Project::new(
            "Test",
            "",
            ProjectType::ApiService,
            ComplexityLevel::Simple,
            2,
            4,
            Vec::new(),
        );
        let id = project.id();
        repo.save(&project).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_some());
        assert!(repo.delete(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn simulations_are_listed_per_project() {
        let repo = InMemorySimulationRepository::new();
        let project_id = ProjectId::new();
        for _ in 0..2 {
            let sim = Simulation::new(project_id, SimulationConfiguration::default(), 3);
            repo.save(&sim).await.unwrap();
        }
        let other = Simulation::new(ProjectId::new(), SimulationConfiguration::default(), 3);
        repo.save(&other).await.unwrap();

        assert_eq!(repo.find_by_project_id(project_id).await.unwrap().len(), 2);
    }
}
