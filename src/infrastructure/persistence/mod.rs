//! Persistence adapters
//!
//! This module implements the repository ports for the four aggregates.
//! Only the in-memory backend ships here; durable backends plug in behind
//! the same ports.

mod memory;

pub use memory::{
    InMemoryProjectRepository, InMemorySimulationRepository, InMemoryTeamRepository,
    InMemoryTimelineRepository,
};
