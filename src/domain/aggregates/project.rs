//! Project aggregate root
//!
//! A Project owns its ordered phase list and a lightweight roster of the
//! people assigned to it (the Team aggregate owns the full member entities).
//! All modifications go through transition methods that validate invariants
//! and buffer a domain event on success.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{PhaseStatus, ProjectPhase};
use crate::domain::errors::DomainError;
use crate::domain::events::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{ComplexityLevel, ProjectId, ProjectType};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Created,
    Planning,
    InProgress,
    Paused,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::Paused => "paused",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a direct transition between two statuses is allowed
    fn can_transition_to(self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, next),
            (Created, Planning)
                | (Planning, InProgress)
                | (InProgress, Paused)
                | (InProgress, OnHold)
                | (Paused, InProgress)
                | (OnHold, InProgress)
                | (InProgress, Completed)
                | (Created, Cancelled)
                | (Planning, Cancelled)
                | (InProgress, Cancelled)
                | (Paused, Cancelled)
                | (OnHold, Cancelled)
        )
    }
}

/// A roster entry on the project; full member entities live on the Team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    pub name: String,
    pub role: String,
}

/// The Project aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    project_type: ProjectType,
    complexity: ComplexityLevel,
    /// Maximum roster size for this project
    team_size: usize,
    duration_weeks: u32,
    status: ProjectStatus,
    phases: Vec<ProjectPhase>,
    members: Vec<ProjectMember>,
    #[serde(skip)]
    pending_events: Vec<DomainEvent>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        project_type: ProjectType,
        complexity: ComplexityLevel,
        team_size: usize,
        duration_weeks: u32,
        phases: Vec<ProjectPhase>,
    ) -> Self {
        let id = ProjectId::new();
        let name = name.into();
        let mut project = Self {
            id,
            name: name.clone(),
            description: description.into(),
            project_type,
            complexity,
            team_size,
            duration_weeks,
            status: ProjectStatus::Created,
            phases,
            members: Vec::new(),
            pending_events: Vec::new(),
        };
        project.pending_events.push(DomainEvent::ProjectCreated {
            metadata: EventMetadata::default(),
            project_id: id,
            name,
            project_type,
            complexity,
        });
        project
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn complexity(&self) -> ComplexityLevel {
        self.complexity
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    pub fn duration_weeks(&self) -> u32 {
        self.duration_weeks
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn phases(&self) -> &[ProjectPhase] {
        &self.phases
    }

    pub fn members(&self) -> &[ProjectMember] {
        &self.members
    }

    pub fn find_phase(&self, name: &str) -> Option<&ProjectPhase> {
        self.phases.iter().find(|p| p.name == name)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Move the project to a new lifecycle status
    pub fn change_status(&mut self, next: ProjectStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                aggregate: "project",
                from: self.status.display_name().to_string(),
                to: next.display_name().to_string(),
            });
        }
        let from = self.status;
        self.status = next;
        self.pending_events.push(DomainEvent::ProjectStatusChanged {
            metadata: EventMetadata::default(),
            project_id: self.id,
            from: from.display_name().to_string(),
            to: next.display_name().to_string(),
        });
        Ok(())
    }

    /// Start a phase; every declared dependency must already be completed
    pub fn start_phase(&mut self, phase_name: &str) -> Result<(), DomainError> {
        let index = self
            .phases
            .iter()
            .position(|p| p.name == phase_name)
            .ok_or_else(|| DomainError::UnknownPhase(phase_name.to_string()))?;

        if self.phases[index].status != PhaseStatus::Pending {
            return Err(DomainError::PhaseNotInStatus {
                phase: phase_name.to_string(),
                status: self.phases[index].status.display_name().to_string(),
                expected: "pending",
            });
        }

        for dependency in self.phases[index].dependencies.clone() {
            let met = self
                .find_phase(&dependency)
                .map(ProjectPhase::is_completed)
                .unwrap_or(false);
            if !met {
                return Err(DomainError::PhaseDependencyNotMet {
                    phase: phase_name.to_string(),
                    dependency,
                });
            }
        }

        let phase = &mut self.phases[index];
        phase.status = PhaseStatus::InProgress;
        phase.started_at = Some(Utc::now());

        self.pending_events.push(DomainEvent::PhaseStarted {
            metadata: EventMetadata::default(),
            project_id: self.id,
            phase_name: phase_name.to_string(),
        });
        Ok(())
    }

    /// Complete a phase that is currently in progress
    pub fn complete_phase(&mut self, phase_name: &str) -> Result<(), DomainError> {
        let phase = self
            .phases
            .iter_mut()
            .find(|p| p.name == phase_name)
            .ok_or_else(|| DomainError::UnknownPhase(phase_name.to_string()))?;

        if phase.status != PhaseStatus::InProgress {
            return Err(DomainError::PhaseNotInStatus {
                phase: phase_name.to_string(),
                status: phase.status.display_name().to_string(),
                expected: "in_progress",
            });
        }

        phase.status = PhaseStatus::Completed;
        phase.completed_at = Some(Utc::now());

        self.pending_events.push(DomainEvent::PhaseCompleted {
            metadata: EventMetadata::default(),
            project_id: self.id,
            phase_name: phase_name.to_string(),
        });
        Ok(())
    }

    /// Add a person to the roster; the roster never exceeds the team size
    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<(), DomainError> {
        if self.members.len() >= self.team_size {
            return Err(DomainError::TeamFull {
                max_size: self.team_size,
            });
        }
        self.members.push(ProjectMember {
            name: name.into(),
            role: role.into(),
        });
        Ok(())
    }

    /// Drain the buffered domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        let phases = vec![
            ProjectPhase::new("Planning", 5),
            ProjectPhase::new("Implementation", 10).with_dependency("Planning"),
        ];
        Project::new(
            "Checkout Revamp",
            "Rebuild the checkout flow",
            ProjectType::WebApplication,
            ComplexityLevel::Medium,
            3,
            6,
            phases,
        )
    }

    #[test]
    fn new_project_buffers_created_event() {
        let mut project = sample_project();
        let events = project.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "ProjectCreated");
        assert!(project.take_events().is_empty());
    }

    #[test]
    fn phase_with_unmet_dependency_cannot_start() {
        let mut project = sample_project();
        let err = project.start_phase("Implementation").unwrap_err();
        assert!(matches!(err, DomainError::PhaseDependencyNotMet { .. }));
        assert_eq!(
            project.find_phase("Implementation").unwrap().status,
            PhaseStatus::Pending
        );
    }

    #[test]
    fn phase_starts_once_dependencies_complete() {
        let mut project = sample_project();
        project.start_phase("Planning").unwrap();
        project.complete_phase("Planning").unwrap();
        project.start_phase("Implementation").unwrap();
        assert_eq!(
            project.find_phase("Implementation").unwrap().status,
            PhaseStatus::InProgress
        );
    }

    #[test]
    fn status_transitions_are_validated() {
        let mut project = sample_project();
        assert!(project.change_status(ProjectStatus::Completed).is_err());
        project.change_status(ProjectStatus::Planning).unwrap();
        project.change_status(ProjectStatus::InProgress).unwrap();
        project.change_status(ProjectStatus::Paused).unwrap();
        project.change_status(ProjectStatus::InProgress).unwrap();
        project.change_status(ProjectStatus::Completed).unwrap();
        assert!(project.change_status(ProjectStatus::InProgress).is_err());
    }

    #[test]
    fn roster_is_bounded_by_team_size() {
        let mut project = sample_project();
        project.add_member("Ada", "Engineer").unwrap();
        project.add_member("Grace", "Engineer").unwrap();
        project.add_member("Linus", "Tech Lead").unwrap();
        let err = project.add_member("Margaret", "Engineer").unwrap_err();
        assert!(matches!(err, DomainError::TeamFull { max_size: 3 }));
        assert_eq!(project.members().len(), 3);
    }
}
