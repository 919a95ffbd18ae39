//! Domain events - Notifications of significant state changes
//!
//! Domain events represent things that have happened in the domain. They are
//! produced exclusively by aggregate transition methods, buffered on the
//! aggregate, and drained by the orchestration engine into the event bus.
//! Once created an event is never mutated. Delivery is at-most-once per
//! publish; there is no durable retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{
    ComplexityLevel, DomainEventId, ProjectId, ProjectType, SimulationId, TeamId, TeamMemberId,
    TimelineId, WorkflowKind,
};

/// Base data carried by every event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: DomainEventId,
    /// Schema version of the event payload
    pub version: u16,
    /// When the event occurred
    pub occurred_at: DateTime<Utc>,
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self {
            event_id: DomainEventId::new(),
            version: 1,
            occurred_at: Utc::now(),
        }
    }
}

/// All domain events in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DomainEvent {
    // ========================================================================
    // Project Events
    // ========================================================================

    /// A new project was created
    ProjectCreated {
        metadata: EventMetadata,
        project_id: ProjectId,
        name: String,
        project_type: ProjectType,
        complexity: ComplexityLevel,
    },

    /// A project moved to a new status
    ProjectStatusChanged {
        metadata: EventMetadata,
        project_id: ProjectId,
        from: String,
        to: String,
    },

    /// A project phase started
    PhaseStarted {
        metadata: EventMetadata,
        project_id: ProjectId,
        phase_name: String,
    },

    /// A project phase completed
    PhaseCompleted {
        metadata: EventMetadata,
        project_id: ProjectId,
        phase_name: String,
    },

    // ========================================================================
    // Timeline Events
    // ========================================================================

    /// A timeline phase ran longer than planned
    PhaseDelayed {
        metadata: EventMetadata,
        timeline_id: TimelineId,
        phase_name: String,
        planned_duration_days: u32,
        actual_duration_days: u32,
    },

    /// A milestone was achieved
    MilestoneAchieved {
        metadata: EventMetadata,
        timeline_id: TimelineId,
        phase_name: String,
        milestone_name: String,
    },

    // ========================================================================
    // Team Events
    // ========================================================================

    /// A member joined the team
    TeamMemberAdded {
        metadata: EventMetadata,
        team_id: TeamId,
        member_id: TeamMemberId,
        name: String,
        role: String,
    },

    /// Team health scores moved
    TeamDynamicsShifted {
        metadata: EventMetadata,
        team_id: TeamId,
        overall: f64,
    },

    // ========================================================================
    // Simulation Events
    // ========================================================================

    /// A simulation run started
    SimulationStarted {
        metadata: EventMetadata,
        simulation_id: SimulationId,
        project_id: ProjectId,
    },

    /// A running simulation was paused
    SimulationPaused {
        metadata: EventMetadata,
        simulation_id: SimulationId,
    },

    /// A paused simulation resumed
    SimulationResumed {
        metadata: EventMetadata,
        simulation_id: SimulationId,
    },

    /// A simulation reached COMPLETED
    SimulationCompleted {
        metadata: EventMetadata,
        simulation_id: SimulationId,
        success: bool,
        execution_time_ms: u64,
    },

    /// A simulation reached FAILED
    SimulationFailed {
        metadata: EventMetadata,
        simulation_id: SimulationId,
        reason: String,
    },

    /// A simulation was cancelled
    SimulationCancelled {
        metadata: EventMetadata,
        simulation_id: SimulationId,
    },

    /// A document was generated during a simulation run
    DocumentGenerated {
        metadata: EventMetadata,
        simulation_id: SimulationId,
        document_type: String,
        title: String,
        word_count: u32,
        quality_score: f64,
    },

    /// A workflow was executed during a simulation run
    WorkflowExecuted {
        metadata: EventMetadata,
        simulation_id: SimulationId,
        kind: WorkflowKind,
        success: bool,
        execution_time_ms: u64,
    },
}

impl DomainEvent {
    /// Get the metadata for this event
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            DomainEvent::ProjectCreated { metadata, .. } => metadata,
            DomainEvent::ProjectStatusChanged { metadata, .. } => metadata,
            DomainEvent::PhaseStarted { metadata, .. } => metadata,
            DomainEvent::PhaseCompleted { metadata, .. } => metadata,
            DomainEvent::PhaseDelayed { metadata, .. } => metadata,
            DomainEvent::MilestoneAchieved { metadata, .. } => metadata,
            DomainEvent::TeamMemberAdded { metadata, .. } => metadata,
            DomainEvent::TeamDynamicsShifted { metadata, .. } => metadata,
            DomainEvent::SimulationStarted { metadata, .. } => metadata,
            DomainEvent::SimulationPaused { metadata, .. } => metadata,
            DomainEvent::SimulationResumed { metadata, .. } => metadata,
            DomainEvent::SimulationCompleted { metadata, .. } => metadata,
            DomainEvent::SimulationFailed { metadata, .. } => metadata,
            DomainEvent::SimulationCancelled { metadata, .. } => metadata,
            DomainEvent::DocumentGenerated { metadata, .. } => metadata,
            DomainEvent::WorkflowExecuted { metadata, .. } => metadata,
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::ProjectCreated { .. } => "ProjectCreated",
            DomainEvent::ProjectStatusChanged { .. } => "ProjectStatusChanged",
            DomainEvent::PhaseStarted { .. } => "PhaseStarted",
            DomainEvent::PhaseCompleted { .. } => "PhaseCompleted",
            DomainEvent::PhaseDelayed { .. } => "PhaseDelayed",
            DomainEvent::MilestoneAchieved { .. } => "MilestoneAchieved",
            DomainEvent::TeamMemberAdded { .. } => "TeamMemberAdded",
            DomainEvent::TeamDynamicsShifted { .. } => "TeamDynamicsShifted",
            DomainEvent::SimulationStarted { .. } => "SimulationStarted",
            DomainEvent::SimulationPaused { .. } => "SimulationPaused",
            DomainEvent::SimulationResumed { .. } => "SimulationResumed",
            DomainEvent::SimulationCompleted { .. } => "SimulationCompleted",
            DomainEvent::SimulationFailed { .. } => "SimulationFailed",
            DomainEvent::SimulationCancelled { .. } => "SimulationCancelled",
            DomainEvent::DocumentGenerated { .. } => "DocumentGenerated",
            DomainEvent::WorkflowExecuted { .. } => "WorkflowExecuted",
        }
    }

    /// The id of the aggregate the event originated from
    pub fn aggregate_id(&self) -> Uuid {
        match self {
            DomainEvent::ProjectCreated { project_id, .. } => (*project_id).into(),
            DomainEvent::ProjectStatusChanged { project_id, .. } => (*project_id).into(),
            DomainEvent::PhaseStarted { project_id, .. } => (*project_id).into(),
            DomainEvent::PhaseCompleted { project_id, .. } => (*project_id).into(),
            DomainEvent::PhaseDelayed { timeline_id, .. } => (*timeline_id).into(),
            DomainEvent::MilestoneAchieved { timeline_id, .. } => (*timeline_id).into(),
            DomainEvent::TeamMemberAdded { team_id, .. } => (*team_id).into(),
            DomainEvent::TeamDynamicsShifted { team_id, .. } => (*team_id).into(),
            DomainEvent::SimulationStarted { simulation_id, .. } => (*simulation_id).into(),
            DomainEvent::SimulationPaused { simulation_id, .. } => (*simulation_id).into(),
            DomainEvent::SimulationResumed { simulation_id, .. } => (*simulation_id).into(),
            DomainEvent::SimulationCompleted { simulation_id, .. } => (*simulation_id).into(),
            DomainEvent::SimulationFailed { simulation_id, .. } => (*simulation_id).into(),
            DomainEvent::SimulationCancelled { simulation_id, .. } => (*simulation_id).into(),
            DomainEvent::DocumentGenerated { simulation_id, .. } => (*simulation_id).into(),
            DomainEvent::WorkflowExecuted { simulation_id, .. } => (*simulation_id).into(),
        }
    }
}
