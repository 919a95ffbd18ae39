//! Team member entity

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    clamp_score, CommunicationStyle, ExpertiseLevel, TeamMemberId, WorkStyle,
};

/// A person on the simulated delivery team
///
/// Morale and burnout risk are clamped to 0..=100 on every update; callers
/// can pass arbitrary deltas without worrying about the bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub expertise: ExpertiseLevel,
    pub communication_style: CommunicationStyle,
    pub work_style: WorkStyle,
    /// 0..=100
    pub morale: u8,
    /// 0..=100
    pub burnout_risk: u8,
    pub productivity_multiplier: f64,
}

impl TeamMember {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        expertise: ExpertiseLevel,
    ) -> Self {
        Self {
            id: TeamMemberId::new(),
            name: name.into(),
            email: email.into(),
            role: role.into(),
            expertise,
            communication_style: CommunicationStyle::default(),
            work_style: WorkStyle::default(),
            morale: 75,
            burnout_risk: 20,
            productivity_multiplier: expertise.base_productivity(),
        }
    }

    pub fn with_communication_style(mut self, style: CommunicationStyle) -> Self {
        self.communication_style = style;
        self
    }

    pub fn with_work_style(mut self, style: WorkStyle) -> Self {
        self.work_style = style;
        self
    }

    /// Apply a signed morale delta, clamped to the valid range
    pub fn adjust_morale(&mut self, delta: i32) {
        self.morale = clamp_score(i32::from(self.morale) + delta);
    }

    /// Apply a signed burnout-risk delta, clamped to the valid range
    pub fn adjust_burnout_risk(&mut self, delta: i32) {
        self.burnout_risk = clamp_score(i32::from(self.burnout_risk) + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morale_and_burnout_are_clamped() {
        let mut member = TeamMember::new("Ada", "ada@example.com", "Engineer", ExpertiseLevel::Senior);
        member.adjust_morale(500);
        assert_eq!(member.morale, 100);
        member.adjust_morale(-500);
        assert_eq!(member.morale, 0);
        member.adjust_burnout_risk(-500);
        assert_eq!(member.burnout_risk, 0);
        member.adjust_burnout_risk(101);
        assert_eq!(member.burnout_risk, 100);
    }

    #[test]
    fn productivity_follows_expertise() {
        let junior = TeamMember::new("J", "j@example.com", "Engineer", ExpertiseLevel::Junior);
        let lead = TeamMember::new("L", "l@example.com", "Tech Lead", ExpertiseLevel::Lead);
        assert!(lead.productivity_multiplier > junior.productivity_multiplier);
    }
}
