//! Ecosystem service mesh client
//!
//! HTTP adapter for the document-generator, workflow-orchestrator and
//! team-analytics services. One client covers the mesh; requests are routed
//! by service path under a single base URL.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::application::ports::outbound::{DocumentGenerationPort, WorkflowExecutionPort};
use crate::domain::aggregates::{Project, Team};
use crate::domain::value_objects::{
    ComplexityLevel, GeneratedDocument, ProjectType, WorkflowExecution, WorkflowKind,
};

/// Client for the ecosystem service mesh
pub struct EcosystemClient {
    client: Client,
    base_url: String,
}

impl EcosystemClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, EcosystemError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EcosystemError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EcosystemError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

// =============================================================================
// Wire payloads
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateDocumentsRequest<'a> {
    project_name: &'a str,
    project_type: ProjectType,
    complexity: ComplexityLevel,
    phase: &'a str,
    deliverables: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateDocumentsResponse {
    documents: Vec<DocumentPayload>,
}

#[derive(Debug, Deserialize)]
struct DocumentPayload {
    document_type: String,
    title: String,
    content: String,
    word_count: u32,
    quality_score: f64,
    #[serde(default)]
    metadata: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct DocumentAnalysisRequest {
    documents: Vec<DocumentSummary>,
}

#[derive(Debug, Serialize)]
struct DocumentSummary {
    title: String,
    document_type: String,
    word_count: u32,
    quality_score: f64,
}

#[derive(Debug, Serialize)]
struct TeamDynamicsRequest {
    members: Vec<MemberSummary>,
    communication: u8,
    collaboration: u8,
    conflict_resolution: u8,
    trust: u8,
}

#[derive(Debug, Serialize)]
struct MemberSummary {
    role: String,
    expertise: String,
    morale: u8,
    burnout_risk: u8,
}

#[derive(Debug, Deserialize)]
struct WorkflowResponse {
    success: bool,
    execution_time_ms: u64,
    summary: String,
    #[serde(default)]
    details: serde_json::Value,
}

impl WorkflowResponse {
    fn into_execution(self, kind: WorkflowKind) -> WorkflowExecution {
        WorkflowExecution {
            kind,
            success: self.success,
            execution_time_ms: self.execution_time_ms,
            summary: self.summary,
            details: self.details,
        }
    }
}

// =============================================================================
// Port implementations
// =============================================================================

#[async_trait]
impl DocumentGenerationPort for EcosystemClient {
    async fn generate_phase_documents(
        &self,
        project: &Project,
        phase_name: &str,
    ) -> Result<Vec<GeneratedDocument>> {
        let deliverables = project
            .find_phase(phase_name)
            .map(|p| p.deliverables.clone())
            .unwrap_or_default();
        let request = GenerateDocumentsRequest {
            project_name: project.name(),
            project_type: project.project_type(),
            complexity: project.complexity(),
            phase: phase_name,
            deliverables,
        };

        let response: GenerateDocumentsResponse = self
            .post_json("/api/document-generator/generate", &request)
            .await?;

        Ok(response
            .documents
            .into_iter()
            .map(|d| GeneratedDocument {
                document_type: d.document_type,
                title: d.title,
                content: d.content,
                word_count: d.word_count,
                quality_score: d.quality_score,
                metadata: d.metadata,
            })
            .collect())
    }
}

#[async_trait]
impl WorkflowExecutionPort for EcosystemClient {
    async fn execute_document_analysis(
        &self,
        documents: &[GeneratedDocument],
    ) -> Result<WorkflowExecution> {
        let request = DocumentAnalysisRequest {
            documents: documents
                .iter()
                .map(|d| DocumentSummary {
                    title: d.title.clone(),
                    document_type: d.document_type.clone(),
                    word_count: d.word_count,
                    quality_score: d.quality_score,
                })
                .collect(),
        };

        let response: WorkflowResponse = self
            .post_json("/api/workflow-orchestrator/document-analysis", &request)
            .await?;
        Ok(response.into_execution(WorkflowKind::DocumentAnalysis))
    }

    async fn execute_team_dynamics(&self, team: &Team) -> Result<WorkflowExecution> {
        let dynamics = team.dynamics();
        let request = TeamDynamicsRequest {
            members: team
                .members()
                .iter()
                .map(|m| MemberSummary {
                    role: m.role.clone(),
                    expertise: m.expertise.display_name().to_string(),
                    morale: m.morale,
                    burnout_risk: m.burnout_risk,
                })
                .collect(),
            communication: dynamics.communication,
            collaboration: dynamics.collaboration,
            conflict_resolution: dynamics.conflict_resolution,
            trust: dynamics.trust,
        };

        let response: WorkflowResponse = self
            .post_json("/api/team-analytics/team-dynamics", &request)
            .await?;
        Ok(response.into_execution(WorkflowKind::TeamDynamics))
    }
}
