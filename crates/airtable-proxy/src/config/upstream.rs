//! Airtable API configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Airtable API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the Airtable REST API, without base or table segments
    pub api_base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout: u64,

    /// Connection timeout in seconds
    pub connect_timeout: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.airtable.com/v0".to_string(),
            request_timeout: 20,
            connect_timeout: 5,
        }
    }
}

impl UpstreamConfig {
    /// Parse the API base URL
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidValue {
            field: "upstream.api_base_url".to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                field: "upstream.api_base_url".to_string(),
                reason: "must be a hierarchical http(s) URL".to_string(),
            });
        }

        Ok(url)
    }
}
