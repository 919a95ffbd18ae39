//! Artifacts produced by a simulation run
//!
//! Documents come back from the document-generator service; workflow
//! executions come back from the workflow orchestrator. Both are recorded on
//! the Simulation aggregate and collected into the final result.

use serde::{Deserialize, Serialize};

/// A document produced for a phase by the document-generator service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub document_type: String,
    pub title: String,
    pub content: String,
    pub word_count: u32,
    /// Normalized 0.0..=1.0 quality estimate from the generator
    pub quality_score: f64,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// The kind of workflow the orchestrator ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    DocumentAnalysis,
    TeamDynamics,
}

impl WorkflowKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DocumentAnalysis => "Document Analysis",
            Self::TeamDynamics => "Team Dynamics",
        }
    }
}

/// Outcome of one workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub kind: WorkflowKind,
    pub success: bool,
    pub execution_time_ms: u64,
    pub summary: String,
    #[serde(default)]
    pub details: serde_json::Value,
}
