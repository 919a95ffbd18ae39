//! Simulation aggregate root
//!
//! A Simulation references its Project by id and tracks one run of the
//! delivery simulation through the canonical state machine:
//!
//! CREATED -> STARTING -> RUNNING <-> PAUSED
//! RUNNING -> COMPLETED | FAILED; any non-terminal state -> CANCELLED
//!
//! Terminal states reject every further transition, including
//! `fail_simulation` on an already-completed run. The guard lives inside the
//! aggregate so no caller can bypass it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::events::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{
    GeneratedDocument, ProjectId, SimulationConfiguration, SimulationId, SimulationResult,
    WorkflowExecution,
};

/// Simulation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    Created,
    Starting,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl SimulationStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Counters and timestamps for a run in flight
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationProgress {
    pub total_phases: u32,
    pub phases_completed: u32,
    pub documents_generated: u32,
    pub workflows_executed: u32,
    pub current_phase: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
}

impl SimulationProgress {
    pub fn completion_percent(&self) -> f64 {
        if self.total_phases == 0 {
            return 0.0;
        }
        f64::from(self.phases_completed) * 100.0 / f64::from(self.total_phases)
    }
}

/// The Simulation aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    id: SimulationId,
    project_id: ProjectId,
    config: SimulationConfiguration,
    status: SimulationStatus,
    progress: SimulationProgress,
    result: Option<SimulationResult>,
    #[serde(skip)]
    pending_events: Vec<DomainEvent>,
}

impl Simulation {
    pub fn new(project_id: ProjectId, config: SimulationConfiguration, total_phases: u32) -> Self {
        Self {
            id: SimulationId::new(),
            project_id,
            config,
            status: SimulationStatus::Created,
            progress: SimulationProgress {
                total_phases,
                ..SimulationProgress::default()
            },
            result: None,
            pending_events: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> SimulationId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn config(&self) -> &SimulationConfiguration {
        &self.config
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn progress(&self) -> &SimulationProgress {
        &self.progress
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    /// True once the run has reached any terminal state
    /// (COMPLETED, FAILED or CANCELLED)
    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Soft deadline check; the orchestration engine calls this between phases
    pub fn is_within_time_limit(&self, now: DateTime<Utc>) -> bool {
        match self.progress.started_at {
            Some(started) => {
                let limit = Duration::minutes(i64::from(self.config.max_execution_time_minutes));
                now - started <= limit
            }
            None => true,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Start the run: CREATED -> STARTING -> RUNNING
    ///
    /// STARTING is a transient state; the aggregate lands on RUNNING within
    /// the same call and emits SimulationStarted.
    pub fn start_simulation(&mut self) -> Result<(), DomainError> {
        if self.status != SimulationStatus::Created {
            return Err(self.invalid_transition("running"));
        }
        let now = Utc::now();
        self.status = SimulationStatus::Starting;
        self.progress.started_at = Some(now);
        self.progress.estimated_completion =
            Some(now + Duration::minutes(i64::from(self.config.max_execution_time_minutes)));
        self.status = SimulationStatus::Running;
        self.pending_events.push(DomainEvent::SimulationStarted {
            metadata: EventMetadata::default(),
            simulation_id: self.id,
            project_id: self.project_id,
        });
        Ok(())
    }

    /// Pause a running simulation; a no-op from any other state
    pub fn pause_simulation(&mut self) {
        if self.status == SimulationStatus::Running {
            self.status = SimulationStatus::Paused;
            self.pending_events.push(DomainEvent::SimulationPaused {
                metadata: EventMetadata::default(),
                simulation_id: self.id,
            });
        }
    }

    /// Resume a paused simulation; a no-op from any other state
    pub fn resume_simulation(&mut self) {
        if self.status == SimulationStatus::Paused {
            self.status = SimulationStatus::Running;
            self.pending_events.push(DomainEvent::SimulationResumed {
                metadata: EventMetadata::default(),
                simulation_id: self.id,
            });
        }
    }

    /// Record phase progress: `completed=false` marks the phase as current,
    /// `completed=true` bumps the completed counter
    pub fn update_phase_progress(
        &mut self,
        phase_name: &str,
        completed: bool,
    ) -> Result<(), DomainError> {
        self.ensure_running()?;
        if completed {
            self.progress.phases_completed =
                (self.progress.phases_completed + 1).min(self.progress.total_phases);
            self.progress.current_phase = None;
        } else {
            self.progress.current_phase = Some(phase_name.to_string());
        }
        Ok(())
    }

    /// Record a generated document and emit DocumentGenerated
    pub fn record_document_generation(
        &mut self,
        document: &GeneratedDocument,
    ) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.progress.documents_generated += 1;
        self.pending_events.push(DomainEvent::DocumentGenerated {
            metadata: EventMetadata::default(),
            simulation_id: self.id,
            document_type: document.document_type.clone(),
            title: document.title.clone(),
            word_count: document.word_count,
            quality_score: document.quality_score,
        });
        Ok(())
    }

    /// Record a workflow execution and emit WorkflowExecuted
    pub fn record_workflow_execution(
        &mut self,
        workflow: &WorkflowExecution,
    ) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.progress.workflows_executed += 1;
        self.pending_events.push(DomainEvent::WorkflowExecuted {
            metadata: EventMetadata::default(),
            simulation_id: self.id,
            kind: workflow.kind,
            success: workflow.success,
            execution_time_ms: workflow.execution_time_ms,
        });
        Ok(())
    }

    /// Finish the run as COMPLETED; only valid from RUNNING
    ///
    /// `result.success` may be false (e.g. a timed-out run completes
    /// unsuccessfully); FAILED is reserved for runs aborted by an error.
    pub fn complete_simulation(&mut self, result: SimulationResult) -> Result<(), DomainError> {
        if self.status != SimulationStatus::Running {
            return Err(self.invalid_transition("completed"));
        }
        self.pending_events.push(DomainEvent::SimulationCompleted {
            metadata: EventMetadata::default(),
            simulation_id: self.id,
            success: result.success,
            execution_time_ms: result.execution_time_ms,
        });
        self.status = SimulationStatus::Completed;
        self.result = Some(result);
        Ok(())
    }

    /// Abort the run as FAILED; valid from any non-terminal state
    pub fn fail_simulation(
        &mut self,
        reason: impl Into<String>,
        execution_time_ms: u64,
    ) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::SimulationTerminal {
                status: self.status.display_name().to_string(),
            });
        }
        let reason = reason.into();
        self.pending_events.push(DomainEvent::SimulationFailed {
            metadata: EventMetadata::default(),
            simulation_id: self.id,
            reason: reason.clone(),
        });
        self.status = SimulationStatus::Failed;
        self.result = Some(SimulationResult::failed(reason, execution_time_ms));
        Ok(())
    }

    /// Cancel the run; valid from any non-terminal state
    pub fn cancel_simulation(&mut self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::SimulationTerminal {
                status: self.status.display_name().to_string(),
            });
        }
        self.status = SimulationStatus::Cancelled;
        self.pending_events.push(DomainEvent::SimulationCancelled {
            metadata: EventMetadata::default(),
            simulation_id: self.id,
        });
        Ok(())
    }

    /// Drain the buffered domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn ensure_running(&self) -> Result<(), DomainError> {
        if self.status != SimulationStatus::Running {
            return Err(DomainError::RuleViolation(format!(
                "simulation is {}, progress mutation requires running",
                self.status.display_name()
            )));
        }
        Ok(())
    }

    fn invalid_transition(&self, to: &str) -> DomainError {
        DomainError::InvalidTransition {
            aggregate: "simulation",
            from: self.status.display_name().to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::SimulationMetrics;

    fn running_simulation() -> Simulation {
        let mut sim = Simulation::new(ProjectId::new(), SimulationConfiguration::default(), 3);
        sim.start_simulation().unwrap();
        sim
    }

    fn completed_result() -> SimulationResult {
        SimulationResult {
            success: true,
            execution_time_ms: 120,
            metrics: SimulationMetrics::from_counts(2, 2, 0, 120),
            documents_created: Vec::new(),
            workflows_executed: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            insights: Vec::new(),
        }
    }

    #[test]
    fn start_moves_to_running_and_emits() {
        let mut sim = Simulation::new(ProjectId::new(), SimulationConfiguration::default(), 3);
        sim.start_simulation().unwrap();
        assert_eq!(sim.status(), SimulationStatus::Running);
        assert!(sim.progress().started_at.is_some());
        assert!(sim.progress().estimated_completion.is_some());
        let events = sim.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "SimulationStarted");
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut sim = running_simulation();
        assert!(sim.start_simulation().is_err());
    }

    #[test]
    fn pause_and_resume_round_trip() {
        let mut sim = running_simulation();
        sim.pause_simulation();
        assert_eq!(sim.status(), SimulationStatus::Paused);
        sim.resume_simulation();
        assert_eq!(sim.status(), SimulationStatus::Running);
    }

    #[test]
    fn pause_outside_running_is_a_no_op() {
        let mut sim = Simulation::new(ProjectId::new(), SimulationConfiguration::default(), 3);
        sim.pause_simulation();
        assert_eq!(sim.status(), SimulationStatus::Created);
        assert!(sim.take_events().is_empty());
    }

    #[test]
    fn complete_requires_running() {
        let mut sim = Simulation::new(ProjectId::new(), SimulationConfiguration::default(), 3);
        assert!(sim.complete_simulation(completed_result()).is_err());
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        let mut sim = running_simulation();
        sim.complete_simulation(completed_result()).unwrap();
        assert!(sim.is_completed());

        let err = sim.fail_simulation("late failure", 1).unwrap_err();
        assert!(matches!(err, DomainError::SimulationTerminal { .. }));
        let err = sim.cancel_simulation().unwrap_err();
        assert!(matches!(err, DomainError::SimulationTerminal { .. }));
        assert_eq!(sim.status(), SimulationStatus::Completed);
    }

    #[test]
    fn fail_is_valid_from_created() {
        let mut sim = Simulation::new(ProjectId::new(), SimulationConfiguration::default(), 3);
        sim.fail_simulation("never started", 0).unwrap();
        assert_eq!(sim.status(), SimulationStatus::Failed);
        assert!(sim.result().is_some());
        assert!(!sim.result().unwrap().success);
    }

    #[test]
    fn progress_mutation_requires_running() {
        let mut sim = running_simulation();
        sim.cancel_simulation().unwrap();
        assert!(sim.update_phase_progress("Design", true).is_err());
    }

    #[test]
    fn phase_counter_never_exceeds_total() {
        let mut sim = running_simulation();
        for _ in 0..5 {
            sim.update_phase_progress("Design", true).unwrap();
        }
        assert_eq!(sim.progress().phases_completed, 3);
    }

    #[test]
    fn time_limit_uses_configured_minutes() {
        let sim = running_simulation();
        let started = sim.progress().started_at.unwrap();
        assert!(sim.is_within_time_limit(started + Duration::minutes(29)));
        assert!(!sim.is_within_time_limit(started + Duration::minutes(31)));
        // A run that never started has no deadline yet.
        let fresh = Simulation::new(ProjectId::new(), SimulationConfiguration::default(), 1);
        assert!(fresh.is_within_time_limit(Utc::now() + Duration::days(365)));
    }
}
