//! SimForge Engine - Backend service for simulating software project delivery
//!
//! The engine models a software project (Project, Timeline, Team) and drives
//! Simulation runs through their phases, generating documents and executing
//! workflows through ~20 external ecosystem services, each guarded by its
//! own circuit breaker.

pub mod application;
pub mod domain;
pub mod infrastructure;
