mod common;

use airtable_proxy::{
    build_router,
    config::{StaticEnv, BLOCS_BIN, DONOR_ID, DONOR_TABLE, DONOR_VIEW, JSONBIN_KEY},
    AppState, Config,
};
use anyhow::Result;
use axum::http::StatusCode;
use common::*;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::json;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use wiremock::MockServer;

fn header<'a>(response: &'a axum::http::Response<axum::body::Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_get_env_waits_for_configured_delay() -> Result<()> {
    let mut config = Config::default();
    config.env_handler.delay_ms = 120;
    let app = router(config, full_env())?;

    let started = Instant::now();
    let response = send(&app, get("/api/getEnv")?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_millis(120));

    Ok(())
}

#[tokio::test]
async fn test_get_env_returns_configured_values_without_token() -> Result<()> {
    let env = full_env()
        .with(DONOR_VIEW, "Grid view")
        .with(BLOCS_BIN, "bin-123")
        .with(JSONBIN_KEY, "$2a$10$key");
    let mut config = Config::default();
    config.env_handler.delay_ms = 0;
    let app = router(config, env)?;

    let response = send(&app, get("/api/getEnv")?).await?;
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(
        header(&response, "cache-control"),
        Some("s-maxage=60, stale-while-revalidate")
    );

    let body = json_body(response).await?;
    assert_eq!(
        body,
        json!({
            "donorId": BASE,
            "donorTable": TABLE,
            "donorView": "Grid view",
            "blocsBin": "bin-123",
            "jsonbinKey": "$2a$10$key"
        })
    );
    assert!(!body.to_string().contains(TOKEN));

    Ok(())
}

#[tokio::test]
async fn test_get_env_omits_unset_values() -> Result<()> {
    let mut config = Config::default();
    config.env_handler.delay_ms = 0;
    let app = router(config, StaticEnv::from([(DONOR_TABLE, TABLE), (DONOR_ID, "")]))?;

    let body = json_body(send(&app, get("/api/getEnv")?).await?).await?;
    assert_eq!(body, json!({ "donorTable": TABLE }));

    Ok(())
}

#[tokio::test]
async fn test_get_env_can_expose_token() -> Result<()> {
    let mut config = Config::default();
    config.env_handler.delay_ms = 0;
    config.env_handler.expose_token = true;
    let app = router(config, full_env())?;

    let body = json_body(send(&app, get("/api/getEnv")?).await?).await?;
    assert_eq!(body["donorToken"], TOKEN);

    Ok(())
}

#[tokio::test]
async fn test_health_reports_donor_config() -> Result<()> {
    let complete = router(Config::default(), full_env())?;
    let response = send(&complete, get("/health")?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["donor_config_complete"], true);
    assert_eq!(body["backend_endpoint"], "https://nyc.cloud.appwrite.io/v1");
    assert_eq!(body["backend_project"], "68554b360036646491e2");

    let partial = router(Config::default(), StaticEnv::from([(DONOR_ID, BASE)]))?;
    let body = json_body(send(&partial, get("/health")?).await?).await?;
    assert_eq!(body["donor_config_complete"], false);

    Ok(())
}

#[tokio::test]
async fn test_openapi_document_lists_endpoints() -> Result<()> {
    let app = router(Config::default(), StaticEnv::new())?;
    let response = send(&app, get("/api-docs/openapi.json")?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await?;
    let paths = &body["paths"];
    assert!(paths.get("/api/airtableProxy").is_some());
    assert!(paths.get("/api/getEnv").is_some());
    assert!(paths.get("/health").is_some());

    Ok(())
}

#[tokio::test]
async fn test_metrics_route_only_when_enabled() -> Result<()> {
    let server = MockServer::start().await;

    let disabled = router(config_for(&server), full_env())?;
    let response = send(&disabled, get("/metrics")?).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mut config = config_for(&server);
    config.telemetry.enable_metrics = true;
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let state = AppState::new(config, Arc::new(full_env()))?.with_metrics(handle);
    let enabled = build_router(state)?;

    let response = send(&enabled, get("/metrics")?).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
