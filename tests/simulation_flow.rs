//! End-to-end simulation flows against in-memory adapters and mock
//! ecosystem collaborators

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use simforge_engine::application::ports::outbound::{
    DocumentGenerationPort, EventSinkPort, SimulationRepositoryPort, WorkflowExecutionPort,
};
use simforge_engine::application::resilience::{
    CircuitBreakerConfig, CircuitBreakerRegistry, ResilientInvoker,
};
use simforge_engine::application::services::{
    CreateSimulationRequest, DomainEventBus, ProjectSimulationService, SimulationServiceError,
};
use simforge_engine::domain::aggregates::{Project, SimulationStatus, Team};
use simforge_engine::domain::value_objects::{
    services, ComplexityLevel, GeneratedDocument, ProjectType, SimulationConfiguration,
    SimulationId, WorkflowExecution, WorkflowKind,
};
use simforge_engine::infrastructure::persistence::{
    InMemoryProjectRepository, InMemorySimulationRepository, InMemoryTeamRepository,
    InMemoryTimelineRepository,
};

// =============================================================================
// Test doubles
// =============================================================================

struct NullSink;

#[async_trait]
impl EventSinkPort for NullSink {
    async fn publish(&self, _event: serde_json::Value) -> Result<()> {
        Ok(())
    }
}

/// Document generator double: counts calls, optionally fails, optionally
/// cancels the simulation it is working for (to exercise cooperative
/// cancellation deterministically)
struct TestDocumentGenerator {
    calls: AtomicU32,
    fail: bool,
    cancel_target: Mutex<Option<(Arc<InMemorySimulationRepository>, SimulationId)>>,
}

impl TestDocumentGenerator {
    fn succeeding() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail: false,
            cancel_target: Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail: true,
            cancel_target: Mutex::new(None),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn cancel_on_first_call(
        &self,
        simulations: Arc<InMemorySimulationRepository>,
        simulation_id: SimulationId,
    ) {
        *self.cancel_target.lock().unwrap() = Some((simulations, simulation_id));
    }
}

#[async_trait]
impl DocumentGenerationPort for TestDocumentGenerator {
    async fn generate_phase_documents(
        &self,
        project: &Project,
        phase_name: &str,
    ) -> Result<Vec<GeneratedDocument>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let target = self.cancel_target.lock().unwrap().take();
        if let Some((simulations, simulation_id)) = target {
            let mut simulation = simulations.find_by_id(simulation_id).await?.unwrap();
            simulation.cancel_simulation()?;
            simulations.save(&simulation).await?;
        }

        if self.fail {
            anyhow::bail!("document generator offline");
        }
        Ok(vec![GeneratedDocument {
            document_type: "specification".to_string(),
            title: format!("{} - {}", project.name(), phase_name),
            content: format!("Generated for {phase_name}"),
            word_count: 500,
            quality_score: 0.9,
            metadata: serde_json::json!({"phase": phase_name}),
        }])
    }
}

struct OkWorkflows {
    calls: AtomicU32,
}

impl OkWorkflows {
    fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl WorkflowExecutionPort for OkWorkflows {
    async fn execute_document_analysis(
        &self,
        documents: &[GeneratedDocument],
    ) -> Result<WorkflowExecution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(WorkflowExecution {
            kind: WorkflowKind::DocumentAnalysis,
            success: true,
            execution_time_ms: 12,
            summary: format!("analyzed {} documents", documents.len()),
            details: serde_json::json!({}),
        })
    }

    async fn execute_team_dynamics(&self, team: &Team) -> Result<WorkflowExecution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(WorkflowExecution {
            kind: WorkflowKind::TeamDynamics,
            success: true,
            execution_time_ms: 9,
            summary: format!("{} members assessed", team.members().len()),
            details: serde_json::json!({}),
        })
    }
}

// =============================================================================
// Harness
// =============================================================================

struct Harness {
    service: ProjectSimulationService,
    simulations: Arc<InMemorySimulationRepository>,
    bus: Arc<DomainEventBus>,
}

fn harness_with_registry(
    documents: Arc<dyn DocumentGenerationPort>,
    workflows: Arc<dyn WorkflowExecutionPort>,
    registry: CircuitBreakerRegistry,
) -> Harness {
    let bus = Arc::new(DomainEventBus::new(Arc::new(NullSink)));
    let simulations = Arc::new(InMemorySimulationRepository::new());
    let service = ProjectSimulationService::new(
        Arc::new(InMemoryProjectRepository::new()),
        Arc::new(InMemoryTimelineRepository::new()),
        Arc::new(InMemoryTeamRepository::new()),
        simulations.clone(),
        documents,
        workflows,
        Arc::new(ResilientInvoker::new(Arc::new(registry))),
        bus.clone(),
    );
    Harness {
        service,
        simulations,
        bus,
    }
}

fn harness(
    documents: Arc<dyn DocumentGenerationPort>,
    workflows: Arc<dyn WorkflowExecutionPort>,
) -> Harness {
    use simforge_engine::domain::value_objects::ecosystem_catalog;
    harness_with_registry(
        documents,
        workflows,
        CircuitBreakerRegistry::from_catalog(ecosystem_catalog()),
    )
}

fn web_app_request() -> CreateSimulationRequest {
    CreateSimulationRequest {
        project_name: "Storefront".to_string(),
        description: "Customer-facing web shop".to_string(),
        project_type: ProjectType::WebApplication,
        complexity: ComplexityLevel::Simple,
        team_size: 5,
        duration_weeks: 6,
        phases: Vec::new(),
        team_members: Vec::new(),
        config: SimulationConfiguration::default(),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn successful_run_completes_with_documents_and_workflows() {
    let documents = Arc::new(TestDocumentGenerator::succeeding());
    let workflows = Arc::new(OkWorkflows::new());
    let h = harness(documents.clone(), workflows.clone());

    let simulation_id = h
        .service
        .create_project_simulation(web_app_request())
        .await
        .unwrap();

    let report = h.service.execute_simulation(simulation_id).await.unwrap();

    assert!(report.success);
    assert!(report.errors.is_empty());
    // Simple complexity plans three default phases, one document each.
    assert_eq!(report.documents.len(), 3);
    // Document analysis plus team dynamics per phase.
    assert_eq!(report.workflows.len(), 6);
    assert!(report.metrics.success_rate > 0.99);
    assert!(!report.insights.is_empty());

    let status = h.service.get_simulation_status(simulation_id).await.unwrap();
    assert_eq!(status.status, SimulationStatus::Completed);
    assert_eq!(status.progress.phases_completed, 3);
    assert_eq!(status.progress.total_phases, 3);
    let summary = status.result.unwrap();
    assert!(summary.success);
    assert_eq!(summary.documents_created, 3);

    let events = h.bus.published_events();
    let count = |t: &str| events.iter().filter(|e| e.event_type() == t).count();
    assert_eq!(count("ProjectCreated"), 1);
    assert_eq!(count("SimulationStarted"), 1);
    assert_eq!(count("DocumentGenerated"), 3);
    assert_eq!(count("WorkflowExecuted"), 6);
    assert_eq!(count("PhaseStarted"), 3);
    assert_eq!(count("MilestoneAchieved"), 3);
    assert_eq!(count("SimulationCompleted"), 1);
}

#[tokio::test]
async fn failing_document_generator_is_a_partial_failure() {
    let documents = Arc::new(TestDocumentGenerator::failing());
    let workflows = Arc::new(OkWorkflows::new());
    let h = harness(documents.clone(), workflows.clone());

    let simulation_id = h
        .service
        .create_project_simulation(web_app_request())
        .await
        .unwrap();
    let report = h.service.execute_simulation(simulation_id).await.unwrap();

    // The run finishes; the generator failures are recorded, not raised.
    assert!(!report.success);
    assert!(!report.errors.is_empty());
    assert!(report.documents.is_empty());
    assert!(!report.workflows.is_empty());
    assert!(report
        .errors
        .iter()
        .all(|e| e.service.as_deref() == Some(services::DOCUMENT_GENERATOR)));

    let status = h.service.get_simulation_status(simulation_id).await.unwrap();
    assert_eq!(status.status, SimulationStatus::Completed);
}

#[tokio::test]
async fn open_breaker_stops_calling_the_generator() {
    let documents = Arc::new(TestDocumentGenerator::failing());
    let workflows = Arc::new(OkWorkflows::new());
    let registry = CircuitBreakerRegistry::with_breakers([
        (
            services::DOCUMENT_GENERATOR.to_string(),
            CircuitBreakerConfig {
                failure_threshold: 2,
                recovery_timeout: Duration::from_secs(60),
                success_threshold: 1,
            },
        ),
        (
            services::WORKFLOW_ORCHESTRATOR.to_string(),
            CircuitBreakerConfig::best_effort(),
        ),
        (
            services::TEAM_ANALYTICS.to_string(),
            CircuitBreakerConfig::best_effort(),
        ),
    ]);
    let h = harness_with_registry(documents.clone(), workflows.clone(), registry);

    let mut request = web_app_request();
    request.complexity = ComplexityLevel::Complex; // five phases
    let simulation_id = h.service.create_project_simulation(request).await.unwrap();
    let report = h.service.execute_simulation(simulation_id).await.unwrap();

    // Two real failures open the breaker; the remaining phases fail fast
    // without touching the collaborator.
    assert_eq!(documents.calls(), 2);
    assert_eq!(report.errors.len(), 5);
    assert!(report.errors[2].message.contains("circuit"));
    // Workflows keep running for every phase.
    assert_eq!(report.workflows.len(), 10);
}

#[tokio::test]
async fn cancellation_mid_run_stops_the_phase_loop() {
    let documents = Arc::new(TestDocumentGenerator::succeeding());
    let workflows = Arc::new(OkWorkflows::new());
    let h = harness(documents.clone(), workflows.clone());

    let simulation_id = h
        .service
        .create_project_simulation(web_app_request())
        .await
        .unwrap();
    documents.cancel_on_first_call(h.simulations.clone(), simulation_id);

    let report = h.service.execute_simulation(simulation_id).await.unwrap();

    assert!(!report.success);
    assert_eq!(documents.calls(), 1);
    assert!(report.warnings.iter().any(|w| w.contains("cancelled")));

    let status = h.service.get_simulation_status(simulation_id).await.unwrap();
    assert_eq!(status.status, SimulationStatus::Cancelled);
}

#[tokio::test]
async fn expired_time_limit_finishes_unsuccessfully_without_phases() {
    let documents = Arc::new(TestDocumentGenerator::succeeding());
    let workflows = Arc::new(OkWorkflows::new());
    let h = harness(documents.clone(), workflows.clone());

    let mut request = web_app_request();
    request.config.max_execution_time_minutes = 0;
    let simulation_id = h.service.create_project_simulation(request).await.unwrap();

    let report = h.service.execute_simulation(simulation_id).await.unwrap();

    assert!(!report.success);
    assert_eq!(documents.calls(), 0);
    assert!(report.errors.iter().any(|e| e.message.contains("time limit")));

    let status = h.service.get_simulation_status(simulation_id).await.unwrap();
    assert_eq!(status.status, SimulationStatus::Completed);
    assert!(!status.result.unwrap().success);
}

#[tokio::test]
async fn disabled_behaviors_are_skipped() {
    let documents = Arc::new(TestDocumentGenerator::succeeding());
    let workflows = Arc::new(OkWorkflows::new());
    let h = harness(documents.clone(), workflows.clone());

    let mut request = web_app_request();
    request.config = SimulationConfiguration {
        document_generation_enabled: true,
        workflow_execution_enabled: false,
        team_dynamics_enabled: false,
        ..SimulationConfiguration::default()
    };
    let simulation_id = h.service.create_project_simulation(request).await.unwrap();
    let report = h.service.execute_simulation(simulation_id).await.unwrap();

    assert!(report.success);
    assert_eq!(report.documents.len(), 3);
    assert!(report.workflows.is_empty());
    assert_eq!(workflows.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Error surface
// =============================================================================

#[tokio::test]
async fn unknown_simulation_is_reported_as_not_found() {
    let h = harness(
        Arc::new(TestDocumentGenerator::succeeding()),
        Arc::new(OkWorkflows::new()),
    );
    let missing = SimulationId::new();
    let err = h.service.execute_simulation(missing).await.unwrap_err();
    assert!(matches!(err, SimulationServiceError::SimulationNotFound(id) if id == missing));

    let err = h.service.get_simulation_status(missing).await.unwrap_err();
    assert!(matches!(err, SimulationServiceError::SimulationNotFound(_)));
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_any_state_exists() {
    let h = harness(
        Arc::new(TestDocumentGenerator::succeeding()),
        Arc::new(OkWorkflows::new()),
    );

    let mut request = web_app_request();
    request.project_name = "  ".to_string();
    let err = h.service.create_project_simulation(request).await.unwrap_err();
    assert!(matches!(err, SimulationServiceError::InvalidConfiguration(_)));

    let mut request = web_app_request();
    request.team_size = 1;
    request.team_members = (0..3)
        .map(|i| simforge_engine::application::services::TeamMemberSpec {
            name: format!("Member {i}"),
            email: format!("m{i}@example.com"),
            role: "Engineer".to_string(),
            expertise: simforge_engine::domain::value_objects::ExpertiseLevel::Mid,
        })
        .collect();
    let err = h.service.create_project_simulation(request).await.unwrap_err();
    assert!(matches!(err, SimulationServiceError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn executing_a_finished_simulation_is_a_rule_violation() {
    let h = harness(
        Arc::new(TestDocumentGenerator::succeeding()),
        Arc::new(OkWorkflows::new()),
    );
    let simulation_id = h
        .service
        .create_project_simulation(web_app_request())
        .await
        .unwrap();
    h.service.execute_simulation(simulation_id).await.unwrap();

    let err = h.service.execute_simulation(simulation_id).await.unwrap_err();
    assert!(matches!(err, SimulationServiceError::Domain(_)));
}

#[tokio::test]
async fn custom_phases_with_unknown_dependency_are_rejected() {
    let h = harness(
        Arc::new(TestDocumentGenerator::succeeding()),
        Arc::new(OkWorkflows::new()),
    );
    let mut request = web_app_request();
    request.phases = vec![
        simforge_engine::application::services::PhaseSpec {
            name: "Build".to_string(),
            duration_days: 5,
            dependencies: vec!["Plan".to_string()],
            deliverables: Vec::new(),
        },
    ];
    let err = h.service.create_project_simulation(request).await.unwrap_err();
    assert!(matches!(err, SimulationServiceError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn custom_phases_run_in_declared_order() {
    let documents = Arc::new(TestDocumentGenerator::succeeding());
    let h = harness(documents.clone(), Arc::new(OkWorkflows::new()));

    let mut request = web_app_request();
    request.phases = vec![
        simforge_engine::application::services::PhaseSpec {
            name: "Plan".to_string(),
            duration_days: 3,
            dependencies: Vec::new(),
            deliverables: vec!["Plan outline".to_string()],
        },
        simforge_engine::application::services::PhaseSpec {
            name: "Build".to_string(),
            duration_days: 7,
            dependencies: vec!["Plan".to_string()],
            deliverables: vec!["Build log".to_string()],
        },
    ];
    let simulation_id = h.service.create_project_simulation(request).await.unwrap();
    let report = h.service.execute_simulation(simulation_id).await.unwrap();

    assert!(report.success);
    assert_eq!(report.documents.len(), 2);
    assert_eq!(documents.calls(), 2);

    let status = h.service.get_simulation_status(simulation_id).await.unwrap();
    assert_eq!(status.progress.total_phases, 2);
    assert_eq!(status.progress.phases_completed, 2);
}
