//! Prometheus exposition

use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// Render collected metrics in the Prometheus text format
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
