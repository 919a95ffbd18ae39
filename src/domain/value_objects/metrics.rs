//! Metrics and final result of a simulation run

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{GeneratedDocument, WorkflowExecution};

/// Aggregate metrics computed by the orchestration engine after the phase loop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub documents_generated: u32,
    pub workflows_executed: u32,
    pub error_count: u32,
    pub execution_time_ms: u64,
    /// 1.0 minus the error ratio over all attempted operations, floored at 0
    pub success_rate: f64,
}

impl SimulationMetrics {
    /// Compute metrics from run counters
    ///
    /// With zero attempted operations the success rate is 1.0; an empty run
    /// did not fail at anything.
    pub fn from_counts(
        documents_generated: u32,
        workflows_executed: u32,
        error_count: u32,
        execution_time_ms: u64,
    ) -> Self {
        let attempted = documents_generated + workflows_executed + error_count;
        let success_rate = if attempted == 0 {
            1.0
        } else {
            (1.0 - f64::from(error_count) / f64::from(attempted)).max(0.0)
        };
        Self {
            documents_generated,
            workflows_executed,
            error_count,
            execution_time_ms,
            success_rate,
        }
    }
}

/// Final outcome of a simulation, created once when the run reaches a
/// terminal state and append-only afterwards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub success: bool,
    pub execution_time_ms: u64,
    pub metrics: SimulationMetrics,
    pub documents_created: Vec<GeneratedDocument>,
    pub workflows_executed: Vec<WorkflowExecution>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub insights: Vec<String>,
}

impl SimulationResult {
    pub fn failed(reason: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            success: false,
            execution_time_ms,
            metrics: SimulationMetrics::default(),
            documents_created: Vec::new(),
            workflows_executed: Vec::new(),
            errors: vec![reason.into()],
            warnings: Vec::new(),
            insights: Vec::new(),
        }
    }
}
