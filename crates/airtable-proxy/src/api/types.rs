//! API types for the proxy endpoints

use crate::config::DonorSettings;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Client-visible environment values returned by `GET /api/getEnv`.
///
/// Unset values are left out of the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvResponse {
    /// Airtable token; only present when token exposure is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_token: Option<String>,

    /// Airtable base id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_id: Option<String>,

    /// Donor table name or id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_table: Option<String>,

    /// Saved view the proxy reads through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_view: Option<String>,

    /// JSON bin holding the bloc layout; not used by the proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocs_bin: Option<String>,

    /// Access key for the bloc layout bin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonbin_key: Option<String>,
}

impl EnvResponse {
    pub fn from_settings(settings: &DonorSettings, expose_token: bool) -> Self {
        Self {
            donor_token: settings
                .token
                .as_ref()
                .filter(|_| expose_token)
                .map(|t| t.expose().to_string()),
            donor_id: settings.base_id.clone(),
            donor_table: settings.table_id.clone(),
            donor_view: settings.view_id.clone(),
            blocs_bin: settings.blocs_bin.clone(),
            jsonbin_key: settings.jsonbin_key.clone(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Response timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Whether DONOR_TOKEN, DONOR_ID and DONOR_TABLE are all set
    pub donor_config_complete: bool,

    /// Backend-as-a-service endpoint handed to browser clients
    pub backend_endpoint: String,

    /// Backend project identifier
    pub backend_project: String,
}
