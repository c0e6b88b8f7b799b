#![allow(dead_code)]

use airtable_proxy::{
    build_router,
    config::{StaticEnv, DONOR_ID, DONOR_TABLE, DONOR_TOKEN},
    AppState, Config,
};
use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{Match, MockServer};

pub const TOKEN: &str = "patTestSecret";
pub const BASE: &str = "appTEST";
pub const TABLE: &str = "Donors";
pub const TABLE_PATH: &str = "/appTEST/Donors";
pub const ORIGIN: &str = "https://donors.example.org";

/// Environment with every required donor variable set
pub fn full_env() -> StaticEnv {
    StaticEnv::from([(DONOR_TOKEN, TOKEN), (DONOR_ID, BASE), (DONOR_TABLE, TABLE)])
}

/// Default configuration pointed at the mock server
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.upstream.api_base_url = server.uri();
    config.env_handler.delay_ms = 0;
    config
}

pub fn router(config: Config, env: StaticEnv) -> Result<Router> {
    let state = AppState::new(config, Arc::new(env))?;
    Ok(build_router(state)?)
}

pub async fn send(app: &Router, request: Request<Body>) -> Result<Response<Body>> {
    Ok(app.clone().oneshot(request).await?)
}

pub fn get(uri: &str) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("GET")
        .uri(uri)
        .header("origin", ORIGIN)
        .body(Body::empty())?)
}

pub fn post_json(uri: &str, body: &Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("origin", ORIGIN)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

pub async fn json_body(response: Response<Body>) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// `{ updates: [...] }` with `n` records `rec00..`, each carrying a Name
pub fn updates_body(n: usize) -> Value {
    let updates: Vec<Value> = (0..n)
        .map(|i| serde_json::json!({"id": format!("rec{i:02}"), "fields": {"Name": format!("Donor {i}")}}))
        .collect();
    serde_json::json!({ "updates": updates })
}

/// Echo the records of a PATCH body back, as Airtable does
pub fn echo_records(request: &wiremock::Request) -> Value {
    let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
    serde_json::json!({ "records": body["records"].clone() })
}

/// Matches PATCH bodies whose first record has the given id
pub struct FirstRecordId(pub &'static str);

impl Match for FirstRecordId {
    fn matches(&self, request: &wiremock::Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|body| body["records"][0]["id"].as_str().map(|id| id == self.0))
            .unwrap_or(false)
    }
}

/// Record counts of every PATCH the mock server received, in order
pub async fn patch_sizes(server: &MockServer) -> Vec<usize> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "PATCH")
        .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
        .map(|body| body["records"].as_array().map(Vec::len).unwrap_or(0))
        .collect()
}
