//! Client configuration handler

use crate::{api::types::EnvResponse, config::DonorSettings, server::AppState};
use axum::{extract::State, Json};
use tracing::debug;

/// Expose client-side configuration values
///
/// Responds after the configured delay; browser clients call this right after
/// page load and rely on the pause to let their own initialisation settle.
#[utoipa::path(
    get,
    path = "/api/getEnv",
    responses(
        (status = 200, description = "Client configuration values", body = EnvResponse),
    ),
    tag = "config",
)]
pub async fn get_env(State(state): State<AppState>) -> Json<EnvResponse> {
    tokio::time::sleep(state.config.env_delay()).await;

    let settings = DonorSettings::load(state.env.as_ref());
    debug!("Serving client configuration");

    Json(EnvResponse::from_settings(
        &settings,
        state.config.env_handler.expose_token,
    ))
}
