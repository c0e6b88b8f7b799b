//! Configuration module for the Airtable proxy

mod backend;
mod cache;
mod donor;
mod env_handler;
mod proxy;
mod server;
mod telemetry;
mod upstream;

pub use backend::BackendConfig;
pub use cache::CachePolicy;
pub use donor::{
    BearerToken, DonorSettings, EnvSource, ProcessEnv, StaticEnv, UpstreamTarget, BLOCS_BIN,
    DONOR_ID, DONOR_MAX_RECORDS, DONOR_TABLE, DONOR_TOKEN, DONOR_VIEW, JSONBIN_KEY,
};
pub use env_handler::EnvHandlerConfig;
pub use proxy::{
    BatchMode, ErrorStatusPolicy, FieldFilter, ProxyConfig, ResponseShape, DEFAULT_DONOR_FIELDS,
    MAX_RECORDS_PER_REQUEST,
};
pub use server::ServerConfig;
pub use telemetry::TelemetryConfig;
pub use upstream::UpstreamConfig;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file, read from the working directory when present
const DEFAULT_CONFIG_FILE: &str = "airtable-proxy.toml";

/// Environment variable prefix for service settings
const ENV_PREFIX: &str = "AIRTABLE_PROXY_";

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration parsing failed
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// A value parsed but is out of range or malformed
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Main configuration structure for the proxy
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Airtable API configuration
    pub upstream: UpstreamConfig,

    /// Data proxy behaviour
    pub proxy: ProxyConfig,

    /// Config handler behaviour
    pub env_handler: EnvHandlerConfig,

    /// Backend-as-a-service client settings
    pub backend: BackendConfig,

    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Load configuration from defaults, a TOML file and `AIRTABLE_PROXY_*` variables
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    /// Load configuration from an explicit TOML string, without environment overrides
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let figment =
            Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(contents));

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract().map_err(|e| ConfigError::ParseError {
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints figment cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let BatchMode::Chunked { size } = self.proxy.batching {
            if size == 0 || size > MAX_RECORDS_PER_REQUEST {
                return Err(ConfigError::InvalidValue {
                    field: "proxy.batching.size".to_string(),
                    reason: format!("must be between 1 and {MAX_RECORDS_PER_REQUEST}, got {size}"),
                });
            }
        }

        self.upstream.base_url()?;
        self.proxy.cache.header_value("proxy.cache")?;
        self.env_handler.cache.header_value("env_handler.cache")?;

        Ok(())
    }

    /// Generate example configuration file
    pub fn generate_example() -> Result<String, ConfigError> {
        let config = Self::default();
        toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError {
            details: format!("Failed to serialize config: {e}"),
        })
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout)
    }

    /// Get upstream request timeout as Duration
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.request_timeout)
    }

    /// Get upstream connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.connect_timeout)
    }

    /// Get the config handler delay as Duration
    pub fn env_delay(&self) -> Duration {
        Duration::from_millis(self.env_handler.delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_address.port(), 3000);
        assert_eq!(config.upstream.api_base_url, "https://api.airtable.com/v0");
        assert_eq!(config.proxy.batching, BatchMode::Chunked { size: 10 });
        assert_eq!(config.proxy.error_status, ErrorStatusPolicy::Uniform);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let serialized = Config::generate_example().unwrap();
        let deserialized = Config::from_toml_str(&serialized).unwrap();

        assert_eq!(
            Config::default().server.bind_address,
            deserialized.server.bind_address
        );
        assert_eq!(deserialized.proxy.batching, BatchMode::Chunked { size: 10 });
        assert_eq!(
            deserialized.proxy.field_filter,
            FieldFilter::default()
        );
    }

    #[test]
    fn test_toml_overrides() {
        let config = Config::from_toml_str(
            r#"
            [proxy]
            response_shape = "passthrough"
            error_status = "semantic"
            allow_base_override = true

            [proxy.batching]
            mode = "single"

            [proxy.field_filter]
            mode = "pass_through"

            [env_handler]
            delay_ms = 5
            expose_token = true
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy.response_shape, ResponseShape::Passthrough);
        assert_eq!(config.proxy.error_status, ErrorStatusPolicy::Semantic);
        assert_eq!(config.proxy.batching, BatchMode::Single);
        assert_eq!(config.proxy.field_filter, FieldFilter::PassThrough);
        assert!(config.proxy.allow_base_override);
        assert_eq!(config.env_delay(), Duration::from_millis(5));
        assert!(config.env_handler.expose_token);
    }

    #[test]
    fn test_rejects_oversized_chunks() {
        let err = Config::from_toml_str(
            r#"
            [proxy.batching]
            mode = "chunked"
            size = 25
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("proxy.batching.size"));
    }

    #[test]
    fn test_rejects_bad_upstream_url() {
        let err = Config::from_toml_str(
            r#"
            [upstream]
            api_base_url = "not a url"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.toml");
        std::fs::write(
            &path,
            "[server]\nbind_address = \"127.0.0.1:9090\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind_address.port(), 9090);
    }

    #[test]
    fn test_duration_conversions() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.upstream_timeout(), Duration::from_secs(20));
        assert_eq!(config.connection_timeout(), Duration::from_secs(5));
        assert_eq!(config.env_delay(), Duration::from_millis(50));
    }
}
