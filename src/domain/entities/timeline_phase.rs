//! Timeline phase and milestone entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::PhaseStatus;

/// Schedule risk attached to a timeline phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl Default for RiskLevel {
    fn default() -> Self {
        Self::Low
    }
}

impl RiskLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A dated checkpoint owned by a timeline phase
///
/// A milestone may only be achieved once every milestone named in
/// `dependencies` has been achieved; the Timeline aggregate enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub due_date: DateTime<Utc>,
    pub achieved_at: Option<DateTime<Utc>>,
    /// Names of milestones that must be achieved before this one
    pub dependencies: Vec<String>,
}

impl Milestone {
    pub fn new(name: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            due_date,
            achieved_at: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, milestone_name: impl Into<String>) -> Self {
        self.dependencies.push(milestone_name.into());
        self
    }

    pub fn is_achieved(&self) -> bool {
        self.achieved_at.is_some()
    }
}

/// Scheduled execution of one project phase on the timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePhase {
    pub name: String,
    pub planned_duration_days: u32,
    pub actual_duration_days: Option<u32>,
    /// 0..=100 completion percentage
    pub progress: u8,
    pub status: PhaseStatus,
    pub dependencies: Vec<String>,
    pub milestones: Vec<Milestone>,
    pub risk_level: RiskLevel,
    pub blockers: Vec<String>,
}

impl TimelinePhase {
    pub fn new(name: impl Into<String>, planned_duration_days: u32) -> Self {
        Self {
            name: name.into(),
            planned_duration_days,
            actual_duration_days: None,
            progress: 0,
            status: PhaseStatus::Pending,
            dependencies: Vec::new(),
            milestones: Vec::new(),
            risk_level: RiskLevel::default(),
            blockers: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, phase_name: impl Into<String>) -> Self {
        self.dependencies.push(phase_name.into());
        self
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestones.push(milestone);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == PhaseStatus::Completed
    }

    /// True once the phase ran longer than planned
    pub fn is_delayed(&self) -> bool {
        self.actual_duration_days
            .map(|actual| actual > self.planned_duration_days)
            .unwrap_or(false)
    }
}
