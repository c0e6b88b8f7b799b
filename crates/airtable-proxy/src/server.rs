//! Main server implementation for the Airtable proxy

use crate::{
    api,
    config::{Config, ConfigError, EnvSource, ProcessEnv},
    error::{Error, Result},
};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use url::Url;

/// Main server structure
pub struct Server {
    config: Arc<Config>,
    app: Router,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Where donor settings are read from on every invocation
    pub env: Arc<dyn EnvSource>,

    /// HTTP client for Airtable requests
    pub http_client: reqwest::Client,

    /// Parsed Airtable API base URL
    pub api_base: Url,

    /// Prometheus handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state reading donor settings from `env`
    pub fn new(config: Config, env: Arc<dyn EnvSource>) -> Result<Self> {
        config.validate()?;
        let api_base = config.upstream.base_url()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .connect_timeout(config.connection_timeout())
            .pool_max_idle_per_host(10)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self {
            config: Arc::new(config),
            env,
            http_client,
            api_base,
            metrics: None,
        })
    }

    /// Attach a Prometheus handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Server {
    /// Create a new server instance reading donor settings from the process environment
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing Airtable proxy server");

        let mut state = AppState::new(config, Arc::new(ProcessEnv))?;

        if state.config.telemetry.enable_metrics {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| Error::Internal {
                    message: format!("Failed to install metrics recorder: {e}"),
                })?;
            state = state.with_metrics(handle);
            info!(
                "Prometheus metrics available at {}",
                state.config.telemetry.metrics_path
            );
        }

        let config = state.config.clone();
        let app = build_router(state)?;

        Ok(Self { config, app })
    }

    /// Run the server until shutdown signal
    pub async fn run(self) -> Result<()> {
        let addr = self.config.server.bind_address;

        info!("Starting HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Internal {
                message: format!("Failed to bind to address {addr}: {e}"),
            })?;

        info!("Airtable proxy listening on {}", addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal {
                message: format!("Server error: {e}"),
            })?;

        Ok(())
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: AppState) -> Result<Router> {
    let config = state.config.clone();

    let proxy_cache = config.proxy.cache.header_value("proxy.cache")?;
    let env_cache = config.env_handler.cache.header_value("env_handler.cache")?;

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout()));
    let cors = cors_layer(&config.server.cors_origins)?;

    let mut app = Router::new()
        .merge(api::routes(proxy_cache, env_cache))
        .merge(api::docs_routes());

    if state.metrics.is_some() {
        app = app.merge(api::metrics_routes(&config.telemetry.metrics_path));
    }

    // CORS outermost so timeout responses still carry the allow-origin header
    Ok(app.layer(middleware).layer(cors).with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|e| ConfigError::InvalidValue {
                    field: "server.cors_origins".to_string(),
                    reason: format!("{o}: {e}"),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        AllowOrigin::list(parsed)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down");
        },
    }
}
