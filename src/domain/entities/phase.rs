//! Project phase entity - a dependency-gated unit of project work

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a single phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Completed,
}

impl PhaseStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// A named, ordered phase owned by a Project
///
/// A phase may only start once every phase named in `dependencies` has
/// completed; the Project aggregate enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPhase {
    pub name: String,
    pub planned_duration_days: u32,
    /// Names of phases that must complete before this one starts
    pub dependencies: Vec<String>,
    pub deliverables: Vec<String>,
    pub status: PhaseStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProjectPhase {
    pub fn new(name: impl Into<String>, planned_duration_days: u32) -> Self {
        Self {
            name: name.into(),
            planned_duration_days,
            dependencies: Vec::new(),
            deliverables: Vec::new(),
            status: PhaseStatus::Pending,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn with_dependency(mut self, phase_name: impl Into<String>) -> Self {
        self.dependencies.push(phase_name.into());
        self
    }

    pub fn with_deliverable(mut self, deliverable: impl Into<String>) -> Self {
        self.deliverables.push(deliverable.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == PhaseStatus::Completed
    }
}
