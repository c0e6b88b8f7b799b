//! HTTP surface of the proxy

pub mod routes;
pub mod types;

use crate::server::AppState;
use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;

/// Create the proxy and config handler routes
pub fn routes(proxy_cache: HeaderValue, env_cache: HeaderValue) -> Router<AppState> {
    Router::new()
        .route(
            "/api/airtableProxy",
            get(routes::airtable_proxy::list_records)
                .post(routes::airtable_proxy::update_records)
                // HEAD would otherwise fall through to the GET handler
                .head(routes::airtable_proxy::method_not_allowed)
                .fallback(routes::airtable_proxy::method_not_allowed)
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    proxy_cache,
                )),
        )
        .route(
            "/api/getEnv",
            get(routes::env::get_env).layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                env_cache,
            )),
        )
        .route("/health", get(routes::health::health_check))
}

/// Create OpenAPI documentation routes
pub fn docs_routes() -> Router<AppState> {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

/// Create the metrics route
pub fn metrics_routes(path: &str) -> Router<AppState> {
    Router::new().route(path, get(routes::metrics::render_metrics))
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        routes::airtable_proxy::list_records,
        routes::airtable_proxy::update_records,
        routes::env::get_env,
        routes::health::health_check,
    ),
    components(schemas(
        crate::airtable::UpdateRequest,
        crate::airtable::UpdateRecord,
        crate::airtable::RecordsEnvelope,
        types::EnvResponse,
        types::HealthCheckResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorDetails,
    )),
    tags(
        (name = "proxy", description = "Donor table reads and updates"),
        (name = "config", description = "Client configuration"),
        (name = "health", description = "Health and monitoring"),
    ),
    info(
        title = "Airtable Donor Proxy",
        version = "1.0.0",
        description = "Forwards donor table reads and updates to Airtable with a server-held token",
        license(
            name = "MIT",
        ),
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development"),
    ),
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON
async fn openapi_json() -> impl axum::response::IntoResponse {
    axum::Json(ApiDoc::openapi())
}
