//! Collaborator ports - Interfaces for ecosystem services on the
//! simulation path
//!
//! The orchestration engine never talks to these ports directly; every call
//! goes through the resilient invoker so the per-service circuit breakers
//! see each outcome.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::aggregates::{Project, Team};
use crate::domain::value_objects::{GeneratedDocument, WorkflowExecution};

/// Port for the document-generator ecosystem service
#[async_trait]
pub trait DocumentGenerationPort: Send + Sync {
    /// Produce the documents for one phase of a project
    async fn generate_phase_documents(
        &self,
        project: &Project,
        phase_name: &str,
    ) -> Result<Vec<GeneratedDocument>>;
}

/// Port for the workflow-orchestrator and team-analytics ecosystem services
#[async_trait]
pub trait WorkflowExecutionPort: Send + Sync {
    /// Analyze the documents produced so far in a run
    async fn execute_document_analysis(
        &self,
        documents: &[GeneratedDocument],
    ) -> Result<WorkflowExecution>;

    /// Assess how the team is holding up under the simulated delivery
    async fn execute_team_dynamics(&self, team: &Team) -> Result<WorkflowExecution>;
}
