//! Project Simulation Service - Orchestration engine for simulation runs
//!
//! This service builds the four aggregates from a creation request, then
//! drives a simulation through its timeline phases. Every ecosystem call
//! goes through the resilient invoker; a failing collaborator becomes an
//! error entry in the run report, never an aborted run. Only missing
//! aggregates and storage failures are fatal.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::outbound::{
    DocumentGenerationPort, ProjectRepositoryPort, SimulationRepositoryPort, TeamRepositoryPort,
    TimelineRepositoryPort, WorkflowExecutionPort,
};
use crate::application::resilience::ResilientInvoker;
use crate::application::services::event_bus::DomainEventBus;
use crate::application::services::phase_templates::{
    default_phase_templates, project_phases_from_templates, timeline_phases_for,
};
use crate::domain::aggregates::{
    Project, ProjectStatus, Simulation, SimulationProgress, SimulationStatus, Team, Timeline,
};
use crate::domain::entities::{ProjectPhase, TeamMember};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    services, ComplexityLevel, ExpertiseLevel, GeneratedDocument, ProjectId, ProjectType,
    SimulationConfiguration, SimulationId, SimulationMetrics, SimulationResult, WorkflowExecution,
};

// =============================================================================
// Requests and reports
// =============================================================================

/// A phase supplied explicitly instead of using the type's default template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub name: String,
    pub duration_days: u32,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

/// A team member supplied on creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberSpec {
    pub name: String,
    pub email: String,
    pub role: String,
    pub expertise: ExpertiseLevel,
}

/// Input to `create_project_simulation`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSimulationRequest {
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    pub project_type: ProjectType,
    pub complexity: ComplexityLevel,
    pub team_size: usize,
    pub duration_weeks: u32,
    /// Empty means: plan from the default template for the project type
    #[serde(default)]
    pub phases: Vec<PhaseSpec>,
    /// Empty means: generate a default roster of `team_size` members
    #[serde(default)]
    pub team_members: Vec<TeamMemberSpec>,
    #[serde(default)]
    pub config: SimulationConfiguration,
}

/// One recovered failure from a run
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionError {
    pub phase: Option<String>,
    pub service: Option<String>,
    pub message: String,
}

/// What `execute_simulation` returns, even on partial failure
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub simulation_id: SimulationId,
    pub success: bool,
    pub execution_time_ms: u64,
    pub documents: Vec<GeneratedDocument>,
    pub workflows: Vec<WorkflowExecution>,
    pub errors: Vec<ExecutionError>,
    pub warnings: Vec<String>,
    pub insights: Vec<String>,
    pub metrics: SimulationMetrics,
}

/// Condensed result block for the status view
#[derive(Debug, Clone, Serialize)]
pub struct ResultSummary {
    pub success: bool,
    pub documents_created: usize,
    pub workflows_executed: usize,
    pub error_count: usize,
    pub execution_time_ms: u64,
}

/// Read model for `get_simulation_status`
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStatusView {
    pub simulation_id: SimulationId,
    pub project_id: ProjectId,
    pub status: SimulationStatus,
    pub progress: SimulationProgress,
    pub result: Option<ResultSummary>,
}

/// Errors surfaced to the caller (configuration problems, rule violations,
/// missing aggregates); dependency failures never appear here
#[derive(Debug, Error)]
pub enum SimulationServiceError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("simulation {0} not found")]
    SimulationNotFound(SimulationId),

    #[error("{kind} for project {project_id} not found")]
    AggregateNotFound {
        kind: &'static str,
        project_id: ProjectId,
    },

    #[error("simulation {0} is already executing")]
    ExecutionInProgress(SimulationId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

// =============================================================================
// Service
// =============================================================================

/// Orchestration engine for project simulations
pub struct ProjectSimulationService {
    projects: Arc<dyn ProjectRepositoryPort>,
    timelines: Arc<dyn TimelineRepositoryPort>,
    teams: Arc<dyn TeamRepositoryPort>,
    simulations: Arc<dyn SimulationRepositoryPort>,
    documents: Arc<dyn DocumentGenerationPort>,
    workflows: Arc<dyn WorkflowExecutionPort>,
    invoker: Arc<ResilientInvoker>,
    event_bus: Arc<DomainEventBus>,
    /// Simulation ids currently executing; a second execute for the same id
    /// is rejected
    in_flight: Mutex<HashSet<SimulationId>>,
}

/// Accumulators for one run
#[derive(Default)]
struct RunAccumulator {
    documents: Vec<GeneratedDocument>,
    workflows: Vec<WorkflowExecution>,
    errors: Vec<ExecutionError>,
    warnings: Vec<String>,
    insights: Vec<String>,
    timed_out: bool,
    cancelled: bool,
}

impl ProjectSimulationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        projects: Arc<dyn ProjectRepositoryPort>,
        timelines: Arc<dyn TimelineRepositoryPort>,
        teams: Arc<dyn TeamRepositoryPort>,
        simulations: Arc<dyn SimulationRepositoryPort>,
        documents: Arc<dyn DocumentGenerationPort>,
        workflows: Arc<dyn WorkflowExecutionPort>,
        invoker: Arc<ResilientInvoker>,
        event_bus: Arc<DomainEventBus>,
    ) -> Self {
        Self {
            projects,
            timelines,
            teams,
            simulations,
            documents,
            workflows,
            invoker,
            event_bus,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn event_bus(&self) -> &Arc<DomainEventBus> {
        &self.event_bus
    }

    // =========================================================================
    // create_project_simulation
    // =========================================================================

    /// Build and persist the Project, Timeline, Team and Simulation for a
    /// new run
    pub async fn create_project_simulation(
        &self,
        request: CreateSimulationRequest,
    ) -> Result<SimulationId, SimulationServiceError> {
        self.validate_request(&request)?;

        let phases = if request.phases.is_empty() {
            let templates = default_phase_templates(request.project_type, request.complexity);
            project_phases_from_templates(&templates, request.complexity, request.duration_weeks)
        } else {
            Self::phases_from_specs(&request.phases)?
        };

        let mut project = Project::new(
            request.project_name.clone(),
            request.description.clone(),
            request.project_type,
            request.complexity,
            request.team_size,
            request.duration_weeks,
            phases,
        );

        let members = if request.team_members.is_empty() {
            Self::default_roster(request.team_size)
        } else {
            request
                .team_members
                .iter()
                .map(|spec| {
                    TeamMember::new(
                        spec.name.clone(),
                        spec.email.clone(),
                        spec.role.clone(),
                        spec.expertise,
                    )
                })
                .collect()
        };

        let mut team = Team::new(project.id(), request.team_size);
        for member in members {
            project.add_member(member.name.clone(), member.role.clone())?;
            team.add_member(member)?;
        }

        let mut timeline = Timeline::new(project.id(), timeline_phases_for(project.phases()));
        let mut simulation = Simulation::new(
            project.id(),
            request.config.clone(),
            project.phases().len() as u32,
        );

        self.projects.save(&project).await?;
        self.timelines.save(&timeline).await?;
        self.teams.save(&team).await?;
        self.simulations.save(&simulation).await?;

        self.publish_events(&mut project, &mut timeline, &mut team, &mut simulation)
            .await;

        tracing::info!(
            simulation_id = %simulation.id(),
            project = %request.project_name,
            phases = project.phases().len(),
            "created project simulation"
        );
        Ok(simulation.id())
    }

    fn validate_request(&self, request: &CreateSimulationRequest) -> Result<(), SimulationServiceError> {
        if request.project_name.trim().is_empty() {
            return Err(SimulationServiceError::InvalidConfiguration(
                "project_name must not be empty".to_string(),
            ));
        }
        if request.team_size == 0 {
            return Err(SimulationServiceError::InvalidConfiguration(
                "team_size must be at least 1".to_string(),
            ));
        }
        if request.duration_weeks == 0 {
            return Err(SimulationServiceError::InvalidConfiguration(
                "duration_weeks must be at least 1".to_string(),
            ));
        }
        if request.team_members.len() > request.team_size {
            return Err(SimulationServiceError::InvalidConfiguration(format!(
                "{} team members declared for a team of {}",
                request.team_members.len(),
                request.team_size
            )));
        }
        Ok(())
    }

    fn phases_from_specs(specs: &[PhaseSpec]) -> Result<Vec<ProjectPhase>, SimulationServiceError> {
        let known: HashSet<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        if known.len() != specs.len() {
            return Err(SimulationServiceError::InvalidConfiguration(
                "phase names must be unique".to_string(),
            ));
        }

        let mut phases = Vec::with_capacity(specs.len());
        for spec in specs {
            for dependency in &spec.dependencies {
                if !known.contains(dependency.as_str()) {
                    return Err(SimulationServiceError::InvalidConfiguration(format!(
                        "phase '{}' depends on unknown phase '{}'",
                        spec.name, dependency
                    )));
                }
            }
            let mut phase = ProjectPhase::new(spec.name.clone(), spec.duration_days.max(1));
            for dependency in &spec.dependencies {
                phase = phase.with_dependency(dependency.clone());
            }
            for deliverable in &spec.deliverables {
                phase = phase.with_deliverable(deliverable.clone());
            }
            phases.push(phase);
        }
        Ok(phases)
    }

    fn default_roster(team_size: usize) -> Vec<TeamMember> {
        const ROLES: &[(&str, ExpertiseLevel)] = &[
            ("Tech Lead", ExpertiseLevel::Lead),
            ("Senior Engineer", ExpertiseLevel::Senior),
            ("Engineer", ExpertiseLevel::Mid),
            ("QA Engineer", ExpertiseLevel::Mid),
            ("Junior Engineer", ExpertiseLevel::Junior),
        ];
        (0..team_size)
            .map(|i| {
                let (role, expertise) = ROLES[i % ROLES.len()];
                TeamMember::new(
                    format!("Sim Member {}", i + 1),
                    format!("member{}@team.sim", i + 1),
                    role,
                    expertise,
                )
            })
            .collect()
    }

    // =========================================================================
    // execute_simulation
    // =========================================================================

    /// Drive a simulation through its phases and return the run report
    ///
    /// Collaborator failures are recovered locally into the report; the
    /// final Simulation state is persisted even when the phase loop fails.
    pub async fn execute_simulation(
        &self,
        simulation_id: SimulationId,
    ) -> Result<ExecutionReport, SimulationServiceError> {
        let _slot = self.acquire_execution_slot(simulation_id)?;

        let mut simulation = self
            .simulations
            .find_by_id(simulation_id)
            .await?
            .ok_or(SimulationServiceError::SimulationNotFound(simulation_id))?;
        let project_id = simulation.project_id();
        let mut project = self.projects.find_by_id(project_id).await?.ok_or(
            SimulationServiceError::AggregateNotFound {
                kind: "project",
                project_id,
            },
        )?;
        let mut timeline = self.timelines.find_by_project_id(project_id).await?.ok_or(
            SimulationServiceError::AggregateNotFound {
                kind: "timeline",
                project_id,
            },
        )?;
        let mut team = self.teams.find_by_project_id(project_id).await?.ok_or(
            SimulationServiceError::AggregateNotFound {
                kind: "team",
                project_id,
            },
        )?;

        let started = Instant::now();
        simulation.start_simulation()?;
        if project.status() == ProjectStatus::Created {
            project.change_status(ProjectStatus::Planning)?;
            project.change_status(ProjectStatus::InProgress)?;
        }
        self.simulations.save(&simulation).await?;
        self.projects.save(&project).await?;
        self.publish_events(&mut project, &mut timeline, &mut team, &mut simulation)
            .await;

        tracing::info!(simulation_id = %simulation_id, "executing simulation");

        let mut run = RunAccumulator::default();
        let loop_result = self
            .run_phase_loop(&mut simulation, &mut project, &mut timeline, &mut team, &mut run)
            .await;

        let execution_time_ms = started.elapsed().as_millis() as u64;

        match loop_result {
            Ok(()) => {
                self.finalize_run(&mut simulation, &mut project, &mut run, execution_time_ms);
            }
            Err(e) => {
                tracing::error!(simulation_id = %simulation_id, error = %e, "phase loop aborted");
                run.errors.push(ExecutionError {
                    phase: None,
                    service: None,
                    message: e.to_string(),
                });
                if !simulation.is_completed() {
                    if let Err(fail_err) =
                        simulation.fail_simulation(e.to_string(), execution_time_ms)
                    {
                        tracing::warn!(error = %fail_err, "could not mark simulation failed");
                    }
                }
            }
        }

        // Finally semantics: the terminal aggregate state is persisted no
        // matter how the loop ended.
        self.persist_all(&simulation, &project, &timeline, &team).await;
        self.publish_events(&mut project, &mut timeline, &mut team, &mut simulation)
            .await;

        let success = simulation.result().map(|r| r.success).unwrap_or(false);
        let metrics = simulation
            .result()
            .map(|r| r.metrics.clone())
            .unwrap_or_else(|| {
                SimulationMetrics::from_counts(
                    run.documents.len() as u32,
                    run.workflows.len() as u32,
                    run.errors.len() as u32,
                    execution_time_ms,
                )
            });

        tracing::info!(
            simulation_id = %simulation_id,
            success,
            documents = run.documents.len(),
            workflows = run.workflows.len(),
            errors = run.errors.len(),
            "simulation finished"
        );

        Ok(ExecutionReport {
            simulation_id,
            success,
            execution_time_ms,
            documents: run.documents,
            workflows: run.workflows,
            errors: run.errors,
            warnings: run.warnings,
            insights: run.insights,
            metrics,
        })
    }

    /// Phase loop; returns Err only for fatal (storage / broken invariant)
    /// conditions
    async fn run_phase_loop(
        &self,
        simulation: &mut Simulation,
        project: &mut Project,
        timeline: &mut Timeline,
        team: &mut Team,
        run: &mut RunAccumulator,
    ) -> Result<(), SimulationServiceError> {
        let phase_names = timeline.phase_names();

        for phase_name in phase_names {
            // Cooperative cancellation between phases.
            if self.adopt_if_terminal(simulation).await? {
                run.warnings
                    .push(format!("cancelled before phase '{phase_name}'"));
                run.cancelled = true;
                return Ok(());
            }

            // Soft deadline between phases.
            if !simulation.is_within_time_limit(Utc::now()) {
                run.errors.push(ExecutionError {
                    phase: Some(phase_name.clone()),
                    service: None,
                    message: format!(
                        "execution time limit of {} minutes exceeded",
                        simulation.config().max_execution_time_minutes
                    ),
                });
                run.timed_out = true;
                return Ok(());
            }

            if let Err(e) = timeline.start_phase(&phase_name) {
                run.errors.push(ExecutionError {
                    phase: Some(phase_name.clone()),
                    service: None,
                    message: e.to_string(),
                });
                tracing::warn!(phase = %phase_name, error = %e, "skipping phase");
                continue;
            }
            project.start_phase(&phase_name)?;
            simulation.update_phase_progress(&phase_name, false)?;
            timeline.update_phase_progress(&phase_name, 10)?;

            let mut phase_had_errors = false;

            // Step 1: document generation.
            if simulation.config().document_generation_enabled {
                match self
                    .invoker
                    .invoke(services::DOCUMENT_GENERATOR, "generate_phase_documents", || {
                        self.documents.generate_phase_documents(&*project, &phase_name)
                    })
                    .await
                {
                    Ok(documents) => {
                        for document in documents {
                            simulation.record_document_generation(&document)?;
                            run.documents.push(document);
                        }
                    }
                    Err(e) => {
                        phase_had_errors = true;
                        run.errors.push(ExecutionError {
                            phase: Some(phase_name.clone()),
                            service: Some(services::DOCUMENT_GENERATOR.to_string()),
                            message: e.to_string(),
                        });
                    }
                }
            }
            timeline.update_phase_progress(&phase_name, 60)?;

            // Step 2: workflows; independent calls within the phase run
            // concurrently.
            if simulation.config().workflow_execution_enabled {
                let team_dynamics_enabled = simulation.config().team_dynamics_enabled;
                let documents_so_far = run.documents.clone();
                let analysis = self.invoker.invoke(
                    services::WORKFLOW_ORCHESTRATOR,
                    "execute_document_analysis",
                    || self.workflows.execute_document_analysis(&documents_so_far),
                );
                let dynamics = async {
                    if team_dynamics_enabled {
                        Some(
                            self.invoker
                                .invoke(services::TEAM_ANALYTICS, "execute_team_dynamics", || {
                                    self.workflows.execute_team_dynamics(&*team)
                                })
                                .await,
                        )
                    } else {
                        None
                    }
                };
                let (analysis_outcome, dynamics_outcome) = futures_util::join!(analysis, dynamics);

                match analysis_outcome {
                    Ok(workflow) => {
                        simulation.record_workflow_execution(&workflow)?;
                        run.workflows.push(workflow);
                    }
                    Err(e) => {
                        phase_had_errors = true;
                        run.errors.push(ExecutionError {
                            phase: Some(phase_name.clone()),
                            service: Some(services::WORKFLOW_ORCHESTRATOR.to_string()),
                            message: e.to_string(),
                        });
                    }
                }
                if let Some(outcome) = dynamics_outcome {
                    match outcome {
                        Ok(workflow) => {
                            simulation.record_workflow_execution(&workflow)?;
                            if workflow.success {
                                team.shift_dynamics(1, 1, 1, 1);
                            } else {
                                team.shift_dynamics(-2, -2, -1, -2);
                            }
                            run.workflows.push(workflow);
                        }
                        Err(e) => {
                            phase_had_errors = true;
                            run.errors.push(ExecutionError {
                                phase: Some(phase_name.clone()),
                                service: Some(services::TEAM_ANALYTICS.to_string()),
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }

            // Step 3: close the phase out on every aggregate. Failures show
            // up as a delayed phase and a morale hit.
            let planned = timeline
                .find_phase(&phase_name)
                .map(|p| p.planned_duration_days)
                .unwrap_or(1);
            let actual = if phase_had_errors {
                timeline.add_blocker(&phase_name, "ecosystem service failures")?;
                planned + (planned / 4).max(1)
            } else {
                planned
            };
            let morale_delta = if phase_had_errors { -4 } else { 2 };
            let member_ids: Vec<_> = team.members().iter().map(|m| m.id).collect();
            for member_id in member_ids {
                team.adjust_member_morale(member_id, morale_delta)?;
            }

            timeline.complete_phase(&phase_name, actual)?;
            let milestone_names: Vec<String> = timeline
                .find_phase(&phase_name)
                .map(|p| p.milestones.iter().map(|m| m.name.clone()).collect())
                .unwrap_or_default();
            for milestone in milestone_names {
                if let Err(e) = timeline.achieve_milestone(&phase_name, &milestone) {
                    run.warnings
                        .push(format!("milestone '{milestone}' not achieved: {e}"));
                }
            }
            project.complete_phase(&phase_name)?;
            simulation.update_phase_progress(&phase_name, true)?;

            // A cancel that landed mid-phase wins over this phase's results.
            if self.adopt_if_terminal(simulation).await? {
                run.warnings
                    .push(format!("cancelled during phase '{phase_name}'"));
                run.cancelled = true;
                return Ok(());
            }
            self.simulations.save(simulation).await?;
            self.publish_events(project, timeline, team, simulation).await;

            tracing::debug!(
                phase = %phase_name,
                progress = timeline.overall_progress(),
                "phase finished"
            );
        }
        Ok(())
    }

    /// Compute metrics and move the simulation to its terminal state
    fn finalize_run(
        &self,
        simulation: &mut Simulation,
        project: &mut Project,
        run: &mut RunAccumulator,
        execution_time_ms: u64,
    ) {
        if simulation.is_completed() {
            // Cancelled mid-run; the terminal state is already authoritative.
            return;
        }

        let metrics = SimulationMetrics::from_counts(
            run.documents.len() as u32,
            run.workflows.len() as u32,
            run.errors.len() as u32,
            execution_time_ms,
        );
        let success = run.errors.is_empty() && !run.timed_out && !run.cancelled;

        if !run.documents.is_empty() {
            let average_quality: f64 = run
                .documents
                .iter()
                .map(|d| d.quality_score)
                .sum::<f64>()
                / run.documents.len() as f64;
            run.insights.push(format!(
                "{} documents generated with average quality {:.2}",
                run.documents.len(),
                average_quality
            ));
        }
        if success {
            run.insights
                .push("all phases completed without ecosystem failures".to_string());
        } else if run.timed_out {
            run.insights
                .push("run stopped at the execution time limit".to_string());
        }

        let result = SimulationResult {
            success,
            execution_time_ms,
            metrics,
            documents_created: run.documents.clone(),
            workflows_executed: run.workflows.clone(),
            errors: run.errors.iter().map(|e| e.message.clone()).collect(),
            warnings: run.warnings.clone(),
            insights: run.insights.clone(),
        };
        if let Err(e) = simulation.complete_simulation(result) {
            tracing::warn!(error = %e, "could not complete simulation");
            return;
        }

        if project.phases().iter().all(|p| p.is_completed())
            && project.status() == ProjectStatus::InProgress
        {
            if let Err(e) = project.change_status(ProjectStatus::Completed) {
                tracing::warn!(error = %e, "could not complete project");
            }
        }
    }

    // =========================================================================
    // cancel / status
    // =========================================================================

    /// Cancel a simulation; a running phase loop notices at the next phase
    /// boundary
    pub async fn cancel_simulation(
        &self,
        simulation_id: SimulationId,
    ) -> Result<(), SimulationServiceError> {
        let mut simulation = self
            .simulations
            .find_by_id(simulation_id)
            .await?
            .ok_or(SimulationServiceError::SimulationNotFound(simulation_id))?;
        simulation.cancel_simulation()?;
        self.simulations.save(&simulation).await?;
        for event in simulation.take_events() {
            self.event_bus.publish(event).await;
        }
        tracing::info!(simulation_id = %simulation_id, "simulation cancelled");
        Ok(())
    }

    /// Status, progress and a condensed result for one simulation
    pub async fn get_simulation_status(
        &self,
        simulation_id: SimulationId,
    ) -> Result<SimulationStatusView, SimulationServiceError> {
        let simulation = self
            .simulations
            .find_by_id(simulation_id)
            .await?
            .ok_or(SimulationServiceError::SimulationNotFound(simulation_id))?;

        let result = simulation.result().map(|r| ResultSummary {
            success: r.success,
            documents_created: r.documents_created.len(),
            workflows_executed: r.workflows_executed.len(),
            error_count: r.errors.len(),
            execution_time_ms: r.execution_time_ms,
        });

        Ok(SimulationStatusView {
            simulation_id: simulation.id(),
            project_id: simulation.project_id(),
            status: simulation.status(),
            progress: simulation.progress().clone(),
            result,
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn acquire_execution_slot(
        &self,
        simulation_id: SimulationId,
    ) -> Result<ExecutionSlot<'_>, SimulationServiceError> {
        let mut slots = self.lock_slots();
        if !slots.insert(simulation_id) {
            return Err(SimulationServiceError::ExecutionInProgress(simulation_id));
        }
        Ok(ExecutionSlot {
            slots: &self.in_flight,
            simulation_id,
        })
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashSet<SimulationId>> {
        self.in_flight.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Replace the local copy when another caller already drove the
    /// persisted simulation to a terminal state (cancellation, typically)
    async fn adopt_if_terminal(
        &self,
        simulation: &mut Simulation,
    ) -> Result<bool, SimulationServiceError> {
        if simulation.is_completed() {
            return Ok(true);
        }
        if let Some(fresh) = self.simulations.find_by_id(simulation.id()).await? {
            if fresh.status().is_terminal() {
                *simulation = fresh;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn persist_all(
        &self,
        simulation: &Simulation,
        project: &Project,
        timeline: &Timeline,
        team: &Team,
    ) {
        if let Err(e) = self.simulations.save(simulation).await {
            tracing::error!(error = %e, "failed to persist simulation");
        }
        if let Err(e) = self.projects.save(project).await {
            tracing::error!(error = %e, "failed to persist project");
        }
        if let Err(e) = self.timelines.save(timeline).await {
            tracing::error!(error = %e, "failed to persist timeline");
        }
        if let Err(e) = self.teams.save(team).await {
            tracing::error!(error = %e, "failed to persist team");
        }
    }

    async fn publish_events(
        &self,
        project: &mut Project,
        timeline: &mut Timeline,
        team: &mut Team,
        simulation: &mut Simulation,
    ) {
        let events = project
            .take_events()
            .into_iter()
            .chain(timeline.take_events())
            .chain(team.take_events())
            .chain(simulation.take_events());
        for event in events {
            self.event_bus.publish(event).await;
        }
    }
}

/// Releases the per-id execution slot when a run ends, however it ends
struct ExecutionSlot<'a> {
    slots: &'a Mutex<HashSet<SimulationId>>,
    simulation_id: SimulationId,
}

impl Drop for ExecutionSlot<'_> {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        slots.remove(&self.simulation_id);
    }
}
