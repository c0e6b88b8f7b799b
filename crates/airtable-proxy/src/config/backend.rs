//! Backend-as-a-service client settings
//!
//! The browser client talks to a hosted backend for accounts and documents.
//! These two values are fixed per deployment, so they live in the immutable
//! configuration and reach handlers through `AppState`.

use serde::{Deserialize, Serialize};

/// Hosted backend endpoint
pub const DEFAULT_BACKEND_ENDPOINT: &str = "https://nyc.cloud.appwrite.io/v1";

/// Hosted backend project identifier
pub const DEFAULT_BACKEND_PROJECT: &str = "68554b360036646491e2";

/// Backend client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API endpoint
    pub endpoint: String,

    /// Project identifier
    pub project_id: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BACKEND_ENDPOINT.to_string(),
            project_id: DEFAULT_BACKEND_PROJECT.to_string(),
        }
    }
}
