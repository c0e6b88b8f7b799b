//! Error types for the Airtable proxy

use crate::config::{ConfigError, ErrorStatusPolicy};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

/// Main error type for the proxy
#[derive(Debug, Error)]
pub enum Error {
    /// Service configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// One or more required donor settings are absent
    #[error("Missing required configuration: {}", .missing.join(", "))]
    MissingSettings { missing: Vec<&'static str> },

    /// A donor setting is present but unusable
    #[error("Invalid configuration value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },

    /// Airtable answered with a non-success status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// HTTP client error (network failure, undecodable body)
    #[error("{0}")]
    HttpClient(#[from] reqwest::Error),

    /// Invalid request
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Method other than GET or POST
    #[error("Method not allowed")]
    MethodNotAllowed { method: String },

    /// Internal server error
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config(_) => "AIRTABLE_PROXY_CONFIG_ERROR",
            Error::MissingSettings { .. } => "AIRTABLE_PROXY_MISSING_CONFIG",
            Error::InvalidSetting { .. } => "AIRTABLE_PROXY_INVALID_CONFIG",
            Error::Upstream { .. } => "AIRTABLE_PROXY_UPSTREAM_ERROR",
            Error::HttpClient(_) => "AIRTABLE_PROXY_HTTP_CLIENT_ERROR",
            Error::InvalidRequest { .. } => "AIRTABLE_PROXY_INVALID_REQUEST",
            Error::MethodNotAllowed { .. } => "AIRTABLE_PROXY_METHOD_NOT_ALLOWED",
            Error::Internal { .. } => "AIRTABLE_PROXY_INTERNAL_ERROR",
        }
    }

    /// Status code under the given mapping policy.
    ///
    /// `Uniform` reports every failure as 500, which is how the deployed
    /// handlers have always behaved. `Semantic` distinguishes client,
    /// gateway and server faults.
    pub fn status_code(&self, policy: ErrorStatusPolicy) -> StatusCode {
        if policy == ErrorStatusPolicy::Uniform {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Error::Config(_) | Error::MissingSettings { .. } | Error::InvalidSetting { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Upstream { .. } | Error::HttpClient(_) => StatusCode::BAD_GATEWAY,
            Error::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Error::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Non-secret snapshot of the donor settings in use when a request failed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Base identifier in use
    pub base_id: Option<String>,

    /// Table identifier in use
    pub table_id: Option<String>,

    /// View identifier in use
    pub view_id: Option<String>,

    /// Whether a bearer token was configured
    pub has_token: bool,
}

/// Error response structure for API documentation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false; present only when responses are enveloped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    /// Human-readable error message
    pub error: String,

    /// Error code
    pub code: String,

    /// Configuration snapshot, never including the token itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// A handler failure together with the context needed to render it
#[derive(Debug)]
pub struct ProxyFailure {
    pub error: Error,
    pub details: Option<ErrorDetails>,
    pub policy: ErrorStatusPolicy,
    pub envelope: bool,
}

impl ProxyFailure {
    pub fn new(error: Error, policy: ErrorStatusPolicy, envelope: bool) -> Self {
        Self {
            error,
            details: None,
            policy,
            envelope,
        }
    }

    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        let status = self.error.status_code(self.policy);

        let mut body = Map::new();
        if self.envelope {
            body.insert("success".to_string(), Value::Bool(false));
        }
        body.insert("error".to_string(), Value::String(self.error.to_string()));
        body.insert(
            "code".to_string(),
            Value::String(self.error.error_code().to_string()),
        );
        if let Some(details) = &self.details {
            body.insert("details".to_string(), json!(details));
        }

        (status, Json(Value::Object(body))).into_response()
    }
}
