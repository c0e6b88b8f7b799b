//! Health check route handler

use crate::{api::types::HealthCheckResponse, config::DonorSettings, server::AppState};
use axum::{extract::State, Json};

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheckResponse),
    ),
    tag = "health",
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let settings = DonorSettings::load(state.env.as_ref());
    let backend = &state.config.backend;

    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now(),
        donor_config_complete: settings.is_complete(),
        backend_endpoint: backend.endpoint.clone(),
        backend_project: backend.project_id.clone(),
    })
}
