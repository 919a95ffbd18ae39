//! Simulation configuration value object

use serde::{Deserialize, Serialize};

/// Controls which sub-behaviors a simulation run exercises
///
/// Disabled behaviors are skipped entirely by the orchestration engine; the
/// corresponding ecosystem services are never called for that run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfiguration {
    /// Generate phase documents through the document-generator service
    pub document_generation_enabled: bool,
    /// Run document-analysis workflows through the workflow orchestrator
    pub workflow_execution_enabled: bool,
    /// Run the team-dynamics workflow alongside document analysis
    pub team_dynamics_enabled: bool,
    /// Soft deadline for a run; checked between phases, never mid-phase
    pub max_execution_time_minutes: u32,
    /// Inject variance into generated artifacts instead of flat defaults
    pub realistic_artifacts: bool,
}

impl Default for SimulationConfiguration {
    fn default() -> Self {
        Self {
            document_generation_enabled: true,
            workflow_execution_enabled: true,
            team_dynamics_enabled: true,
            max_execution_time_minutes: 30,
            realistic_artifacts: true,
        }
    }
}

impl SimulationConfiguration {
    pub fn documents_only() -> Self {
        Self {
            workflow_execution_enabled: false,
            team_dynamics_enabled: false,
            ..Self::default()
        }
    }
}
