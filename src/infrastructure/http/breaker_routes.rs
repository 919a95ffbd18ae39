//! Circuit breaker operational routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::resilience::BreakerStatus;
use crate::infrastructure::state::AppState;

/// List the status of every circuit breaker
pub async fn list_breakers(State(state): State<Arc<AppState>>) -> Json<Vec<BreakerStatus>> {
    Json(state.breaker_registry.statuses())
}

/// Operational override: reset one breaker to CLOSED
pub async fn reset_breaker(
    State(state): State<Arc<AppState>>,
    Path(service): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.breaker_registry.reset(&service) {
        tracing::info!(service = %service, "circuit breaker reset by operator");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            format!("unknown service '{service}'"),
        ))
    }
}
