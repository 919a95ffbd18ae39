//! Team aggregate root
//!
//! A Team is owned 1:1 by a Project, referenced by project id. It holds a
//! bounded member list (unique ids and emails, never more than max_size) and
//! the team's dynamics scores.

use serde::{Deserialize, Serialize};

use crate::domain::entities::TeamMember;
use crate::domain::errors::DomainError;
use crate::domain::events::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{ProjectId, TeamDynamics, TeamId, TeamMemberId};

/// The Team aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    project_id: ProjectId,
    max_size: usize,
    members: Vec<TeamMember>,
    dynamics: TeamDynamics,
    #[serde(skip)]
    pending_events: Vec<DomainEvent>,
}

impl Team {
    pub fn new(project_id: ProjectId, max_size: usize) -> Self {
        Self {
            id: TeamId::new(),
            project_id,
            max_size,
            members: Vec::new(),
            dynamics: TeamDynamics::default(),
            pending_events: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn dynamics(&self) -> &TeamDynamics {
        &self.dynamics
    }

    pub fn find_member(&self, id: TeamMemberId) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn average_morale(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let total: u32 = self.members.iter().map(|m| u32::from(m.morale)).sum();
        f64::from(total) / self.members.len() as f64
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Add a member; fails beyond max_size or on a duplicate id/email
    pub fn add_member(&mut self, member: TeamMember) -> Result<(), DomainError> {
        if self.members.len() >= self.max_size {
            return Err(DomainError::TeamFull {
                max_size: self.max_size,
            });
        }
        if self.members.iter().any(|m| m.id == member.id) {
            return Err(DomainError::DuplicateMember {
                field: "id",
                value: member.id.to_string(),
            });
        }
        if self.members.iter().any(|m| m.email == member.email) {
            return Err(DomainError::DuplicateMember {
                field: "email",
                value: member.email.clone(),
            });
        }

        self.pending_events.push(DomainEvent::TeamMemberAdded {
            metadata: EventMetadata::default(),
            team_id: self.id,
            member_id: member.id,
            name: member.name.clone(),
            role: member.role.clone(),
        });
        self.members.push(member);
        Ok(())
    }

    /// Apply a morale delta to one member, clamped to 0..=100
    pub fn adjust_member_morale(&mut self, id: TeamMemberId, delta: i32) -> Result<(), DomainError> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DomainError::UnknownMember(id.to_string()))?;
        member.adjust_morale(delta);
        // Sustained low morale shows up as burnout pressure.
        if member.morale < 30 {
            member.adjust_burnout_risk(5);
        }
        Ok(())
    }

    /// Shift the team's dynamics scores and emit the aggregate change
    pub fn shift_dynamics(
        &mut self,
        communication: i32,
        collaboration: i32,
        conflict_resolution: i32,
        trust: i32,
    ) {
        self.dynamics
            .shift(communication, collaboration, conflict_resolution, trust);
        self.pending_events.push(DomainEvent::TeamDynamicsShifted {
            metadata: EventMetadata::default(),
            team_id: self.id,
            overall: self.dynamics.overall(),
        });
    }

    /// Drain the buffered domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ExpertiseLevel;

    fn member(name: &str, email: &str) -> TeamMember {
        TeamMember::new(name, email, "Engineer", ExpertiseLevel::Mid)
    }

    #[test]
    fn add_member_beyond_max_size_fails_and_leaves_members_unchanged() {
        let mut team = Team::new(ProjectId::new(), 2);
        team.add_member(member("Ada", "ada@example.com")).unwrap();
        team.add_member(member("Grace", "grace@example.com")).unwrap();

        let err = team.add_member(member("Linus", "linus@example.com")).unwrap_err();
        assert!(matches!(err, DomainError::TeamFull { max_size: 2 }));
        assert_eq!(team.members().len(), 2);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut team = Team::new(ProjectId::new(), 5);
        team.add_member(member("Ada", "ada@example.com")).unwrap();
        let err = team.add_member(member("Ada Again", "ada@example.com")).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateMember { field: "email", .. }));
        assert_eq!(team.members().len(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut team = Team::new(ProjectId::new(), 5);
        let first = member("Ada", "ada@example.com");
        let mut clone = member("Clone", "clone@example.com");
        clone.id = first.id;
        team.add_member(first).unwrap();
        let err = team.add_member(clone).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateMember { field: "id", .. }));
    }

    #[test]
    fn adding_a_member_emits_event() {
        let mut team = Team::new(ProjectId::new(), 5);
        team.add_member(member("Ada", "ada@example.com")).unwrap();
        let events = team.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "TeamMemberAdded");
    }

    #[test]
    fn low_morale_raises_burnout_risk() {
        let mut team = Team::new(ProjectId::new(), 5);
        let m = member("Ada", "ada@example.com");
        let id = m.id;
        team.add_member(m).unwrap();
        team.adjust_member_morale(id, -60).unwrap();
        let member = team.find_member(id).unwrap();
        assert_eq!(member.morale, 15);
        assert!(member.burnout_risk > 20);
    }
}
