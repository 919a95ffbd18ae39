//! Domain rule violations
//!
//! Every aggregate transition method validates its preconditions and returns
//! one of these errors when the transition is not allowed. The aggregate is
//! left unchanged on error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid {aggregate} transition from {from} to {to}")]
    InvalidTransition {
        aggregate: &'static str,
        from: String,
        to: String,
    },

    #[error("phase '{phase}' cannot start: dependency '{dependency}' is not completed")]
    PhaseDependencyNotMet { phase: String, dependency: String },

    #[error("phase '{phase}' is {status}, expected {expected}")]
    PhaseNotInStatus {
        phase: String,
        status: String,
        expected: &'static str,
    },

    #[error("unknown phase '{0}'")]
    UnknownPhase(String),

    #[error("milestone '{milestone}' cannot be achieved: dependency '{dependency}' is not achieved")]
    MilestoneDependencyNotMet { milestone: String, dependency: String },

    #[error("unknown milestone '{0}'")]
    UnknownMilestone(String),

    #[error("team is already at its maximum size of {max_size}")]
    TeamFull { max_size: usize },

    #[error("team member with {field} '{value}' already exists")]
    DuplicateMember { field: &'static str, value: String },

    #[error("unknown team member '{0}'")]
    UnknownMember(String),

    #[error("simulation is terminal ({status}); no further transitions are accepted")]
    SimulationTerminal { status: String },

    #[error("{0}")]
    RuleViolation(String),
}
