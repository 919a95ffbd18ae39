//! Timeline aggregate root
//!
//! A Timeline is owned 1:1 by a Project, referenced by project id rather
//! than an object pointer. It schedules the project's phases, tracks planned
//! vs. actual durations, and gates both phase starts and milestone
//! achievement on their declared dependencies.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{PhaseStatus, RiskLevel, TimelinePhase};
use crate::domain::errors::DomainError;
use crate::domain::events::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{ProjectId, TimelineId};

/// The Timeline aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    id: TimelineId,
    project_id: ProjectId,
    phases: Vec<TimelinePhase>,
    #[serde(skip)]
    pending_events: Vec<DomainEvent>,
}

impl Timeline {
    pub fn new(project_id: ProjectId, phases: Vec<TimelinePhase>) -> Self {
        Self {
            id: TimelineId::new(),
            project_id,
            phases,
            pending_events: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> TimelineId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn phases(&self) -> &[TimelinePhase] {
        &self.phases
    }

    pub fn find_phase(&self, name: &str) -> Option<&TimelinePhase> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Phase names in scheduled order
    pub fn phase_names(&self) -> Vec<String> {
        self.phases.iter().map(|p| p.name.clone()).collect()
    }

    /// Overall progress as the duration-weighted average of phase progress
    pub fn overall_progress(&self) -> f64 {
        let total_days: u32 = self.phases.iter().map(|p| p.planned_duration_days).sum();
        if total_days == 0 {
            return 0.0;
        }
        let weighted: f64 = self
            .phases
            .iter()
            .map(|p| f64::from(p.progress) * f64::from(p.planned_duration_days))
            .sum();
        weighted / f64::from(total_days)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Start a phase; every declared dependency must already be completed
    pub fn start_phase(&mut self, phase_name: &str) -> Result<(), DomainError> {
        let phase = self
            .find_phase(phase_name)
            .ok_or_else(|| DomainError::UnknownPhase(phase_name.to_string()))?;

        if phase.status != PhaseStatus::Pending {
            return Err(DomainError::PhaseNotInStatus {
                phase: phase_name.to_string(),
                status: phase.status.display_name().to_string(),
                expected: "pending",
            });
        }

        for dependency in &phase.dependencies {
            let met = self
                .find_phase(dependency)
                .map(TimelinePhase::is_completed)
                .unwrap_or(false);
            if !met {
                return Err(DomainError::PhaseDependencyNotMet {
                    phase: phase_name.to_string(),
                    dependency: dependency.clone(),
                });
            }
        }

        let phase = self.phase_mut(phase_name)?;
        phase.status = PhaseStatus::InProgress;
        Ok(())
    }

    /// Update a phase's completion percentage, clamped to 0..=100
    pub fn update_phase_progress(&mut self, phase_name: &str, progress: u8) -> Result<(), DomainError> {
        let phase = self.phase_mut(phase_name)?;
        phase.progress = progress.min(100);
        Ok(())
    }

    /// Record a blocker on an in-progress phase and raise its risk level
    pub fn add_blocker(&mut self, phase_name: &str, blocker: impl Into<String>) -> Result<(), DomainError> {
        let phase = self.phase_mut(phase_name)?;
        phase.blockers.push(blocker.into());
        phase.risk_level = match phase.blockers.len() {
            0..=1 => RiskLevel::Medium,
            _ => RiskLevel::High,
        };
        Ok(())
    }

    /// Complete a phase, recording its actual duration
    ///
    /// Emits PhaseDelayed when the actual duration exceeds the plan.
    pub fn complete_phase(
        &mut self,
        phase_name: &str,
        actual_duration_days: u32,
    ) -> Result<(), DomainError> {
        let timeline_id = self.id;
        let phase = self.phase_mut(phase_name)?;

        if phase.status != PhaseStatus::InProgress {
            return Err(DomainError::PhaseNotInStatus {
                phase: phase_name.to_string(),
                status: phase.status.display_name().to_string(),
                expected: "in_progress",
            });
        }

        phase.status = PhaseStatus::Completed;
        phase.progress = 100;
        phase.actual_duration_days = Some(actual_duration_days);
        let planned = phase.planned_duration_days;

        if actual_duration_days > planned {
            self.pending_events.push(DomainEvent::PhaseDelayed {
                metadata: EventMetadata::default(),
                timeline_id,
                phase_name: phase_name.to_string(),
                planned_duration_days: planned,
                actual_duration_days,
            });
        }
        Ok(())
    }

    /// Mark a milestone achieved; all dependency milestones must be achieved
    pub fn achieve_milestone(
        &mut self,
        phase_name: &str,
        milestone_name: &str,
    ) -> Result<(), DomainError> {
        // Dependency milestones may live on any phase of this timeline.
        let achieved: Vec<String> = self
            .phases
            .iter()
            .flat_map(|p| p.milestones.iter())
            .filter(|m| m.is_achieved())
            .map(|m| m.name.clone())
            .collect();

        let timeline_id = self.id;
        let phase = self.phase_mut(phase_name)?;
        let milestone = phase
            .milestones
            .iter_mut()
            .find(|m| m.name == milestone_name)
            .ok_or_else(|| DomainError::UnknownMilestone(milestone_name.to_string()))?;

        if milestone.is_achieved() {
            return Ok(());
        }
        for dependency in &milestone.dependencies {
            if !achieved.contains(dependency) {
                return Err(DomainError::MilestoneDependencyNotMet {
                    milestone: milestone_name.to_string(),
                    dependency: dependency.clone(),
                });
            }
        }

        milestone.achieved_at = Some(Utc::now());
        self.pending_events.push(DomainEvent::MilestoneAchieved {
            metadata: EventMetadata::default(),
            timeline_id,
            phase_name: phase_name.to_string(),
            milestone_name: milestone_name.to_string(),
        });
        Ok(())
    }

    /// Drain the buffered domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn phase_mut(&mut self, name: &str) -> Result<&mut TimelinePhase, DomainError> {
        self.phases
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| DomainError::UnknownPhase(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Milestone;

    fn sample_timeline() -> Timeline {
        let due = Utc::now() + chrono::Duration::days(30);
        let phases = vec![
            TimelinePhase::new("Design", 5)
                .with_milestone(Milestone::new("Design sign-off", due)),
            TimelinePhase::new("Build", 10)
                .with_dependency("Design")
                .with_milestone(
                    Milestone::new("Feature complete", due).with_dependency("Design sign-off"),
                ),
        ];
        Timeline::new(ProjectId::new(), phases)
    }

    #[test]
    fn phase_with_unmet_dependency_never_starts() {
        let mut timeline = sample_timeline();
        let err = timeline.start_phase("Build").unwrap_err();
        assert!(matches!(err, DomainError::PhaseDependencyNotMet { .. }));
        assert_eq!(timeline.find_phase("Build").unwrap().status, PhaseStatus::Pending);
    }

    #[test]
    fn overall_progress_is_duration_weighted() {
        let mut timeline = sample_timeline();
        timeline.start_phase("Design").unwrap();
        timeline.update_phase_progress("Design", 100).unwrap();
        // Design is 5 of 15 planned days.
        let progress = timeline.overall_progress();
        assert!((progress - 100.0 * 5.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn delayed_phase_emits_event() {
        let mut timeline = sample_timeline();
        timeline.start_phase("Design").unwrap();
        timeline.complete_phase("Design", 8).unwrap();
        let events = timeline.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "PhaseDelayed");
    }

    #[test]
    fn on_time_phase_emits_nothing() {
        let mut timeline = sample_timeline();
        timeline.start_phase("Design").unwrap();
        timeline.complete_phase("Design", 5).unwrap();
        assert!(timeline.take_events().is_empty());
    }

    #[test]
    fn milestone_requires_dependencies_achieved() {
        let mut timeline = sample_timeline();
        let err = timeline.achieve_milestone("Build", "Feature complete").unwrap_err();
        assert!(matches!(err, DomainError::MilestoneDependencyNotMet { .. }));

        timeline.achieve_milestone("Design", "Design sign-off").unwrap();
        timeline.achieve_milestone("Build", "Feature complete").unwrap();
        let events = timeline.take_events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.event_type() == "MilestoneAchieved"));
    }

    #[test]
    fn achieving_twice_is_a_no_op() {
        let mut timeline = sample_timeline();
        timeline.achieve_milestone("Design", "Design sign-off").unwrap();
        timeline.achieve_milestone("Design", "Design sign-off").unwrap();
        assert_eq!(timeline.take_events().len(), 1);
    }
}
