//! Team composition value objects

use serde::{Deserialize, Serialize};

/// Clamp a dynamics or morale score into the 0..=100 domain range
pub(crate) fn clamp_score(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

/// Seniority of a team member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertiseLevel {
    Junior,
    Mid,
    Senior,
    Lead,
}

impl ExpertiseLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Mid => "Mid",
            Self::Senior => "Senior",
            Self::Lead => "Lead",
        }
    }

    /// Baseline productivity multiplier for this level
    pub fn base_productivity(&self) -> f64 {
        match self {
            Self::Junior => 0.7,
            Self::Mid => 1.0,
            Self::Senior => 1.25,
            Self::Lead => 1.4,
        }
    }
}

/// How a member prefers to communicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    Direct,
    Collaborative,
    Analytical,
    Reserved,
}

impl Default for CommunicationStyle {
    fn default() -> Self {
        Self::Collaborative
    }
}

/// How a member structures their work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStyle {
    DeepFocus,
    Iterative,
    Structured,
    Flexible,
}

impl Default for WorkStyle {
    fn default() -> Self {
        Self::Iterative
    }
}

/// Health scores for how the team works together, each clamped to 0..=100
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDynamics {
    pub communication: u8,
    pub collaboration: u8,
    pub conflict_resolution: u8,
    pub trust: u8,
}

impl Default for TeamDynamics {
    fn default() -> Self {
        Self {
            communication: 70,
            collaboration: 70,
            conflict_resolution: 65,
            trust: 75,
        }
    }
}

impl TeamDynamics {
    /// Apply signed deltas to every score, clamping each to the valid range
    pub fn shift(&mut self, communication: i32, collaboration: i32, conflict_resolution: i32, trust: i32) {
        self.communication = clamp_score(i32::from(self.communication) + communication);
        self.collaboration = clamp_score(i32::from(self.collaboration) + collaboration);
        self.conflict_resolution = clamp_score(i32::from(self.conflict_resolution) + conflict_resolution);
        self.trust = clamp_score(i32::from(self.trust) + trust);
    }

    pub fn overall(&self) -> f64 {
        f64::from(
            u32::from(self.communication)
                + u32::from(self.collaboration)
                + u32::from(self.conflict_resolution)
                + u32::from(self.trust),
        ) / 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_clamps_to_valid_range() {
        let mut dynamics = TeamDynamics::default();
        dynamics.shift(1000, -1000, 0, 5);
        assert_eq!(dynamics.communication, 100);
        assert_eq!(dynamics.collaboration, 0);
        assert_eq!(dynamics.conflict_resolution, 65);
        assert_eq!(dynamics.trust, 80);
    }
}
