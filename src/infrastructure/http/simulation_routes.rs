//! Simulation API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::{
    CreateSimulationRequest, ExecutionReport, SimulationServiceError, SimulationStatusView,
};
use crate::domain::value_objects::SimulationId;
use crate::infrastructure::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateSimulationResponse {
    pub simulation_id: String,
}

fn error_response(error: SimulationServiceError) -> (StatusCode, String) {
    let status = match &error {
        SimulationServiceError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
        SimulationServiceError::SimulationNotFound(_)
        | SimulationServiceError::AggregateNotFound { .. } => StatusCode::NOT_FOUND,
        SimulationServiceError::ExecutionInProgress(_) | SimulationServiceError::Domain(_) => {
            StatusCode::CONFLICT
        }
        SimulationServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}

fn parse_simulation_id(id: &str) -> Result<SimulationId, (StatusCode, String)> {
    Uuid::parse_str(id)
        .map(SimulationId::from_uuid)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid simulation ID".to_string()))
}

/// Create a new project simulation
pub async fn create_simulation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSimulationRequest>,
) -> Result<(StatusCode, Json<CreateSimulationResponse>), (StatusCode, String)> {
    let simulation_id = state
        .simulation_service
        .create_project_simulation(req)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSimulationResponse {
            simulation_id: simulation_id.to_string(),
        }),
    ))
}

/// Execute a simulation and return the run report
pub async fn execute_simulation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ExecutionReport>, (StatusCode, String)> {
    let simulation_id = parse_simulation_id(&id)?;
    let report = state
        .simulation_service
        .execute_simulation(simulation_id)
        .await
        .map_err(error_response)?;
    Ok(Json(report))
}

/// Cancel a simulation
pub async fn cancel_simulation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let simulation_id = parse_simulation_id(&id)?;
    state
        .simulation_service
        .cancel_simulation(simulation_id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the status, progress and result summary of a simulation
pub async fn get_simulation_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SimulationStatusView>, (StatusCode, String)> {
    let simulation_id = parse_simulation_id(&id)?;
    let view = state
        .simulation_service
        .get_simulation_status(simulation_id)
        .await
        .map_err(error_response)?;
    Ok(Json(view))
}
