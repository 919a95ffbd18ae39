//! HTTP REST API routes

mod breaker_routes;
mod simulation_routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

pub use breaker_routes::*;
pub use simulation_routes::*;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Simulation routes
        .route("/api/simulations", post(simulation_routes::create_simulation))
        .route(
            "/api/simulations/{id}/execute",
            post(simulation_routes::execute_simulation),
        )
        .route(
            "/api/simulations/{id}/cancel",
            post(simulation_routes::cancel_simulation),
        )
        .route(
            "/api/simulations/{id}/status",
            get(simulation_routes::get_simulation_status),
        )
        // Circuit breaker routes
        .route("/api/circuit-breakers", get(breaker_routes::list_breakers))
        .route(
            "/api/circuit-breakers/{service}/reset",
            post(breaker_routes::reset_breaker),
        )
}
