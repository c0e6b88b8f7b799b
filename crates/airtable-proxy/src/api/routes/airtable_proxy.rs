//! Donor table proxy handlers
//!
//! Every call re-reads the donor settings, resolves them into an upstream
//! target and only then talks to Airtable, so a misconfigured deployment
//! never produces an upstream request.

use crate::{
    airtable::{
        types::records_of, AirtableClient, ListQuery, RecordsEnvelope, UpdateRequest,
    },
    config::{BatchMode, DonorSettings, ResponseShape, UpstreamTarget},
    error::{Error, ProxyFailure, Result},
    server::AppState,
};
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::Method,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Query parameters accepted on GET
#[derive(Debug, Default, PartialEq, Eq)]
struct ProxyQuery {
    base_id: Option<String>,
    offset: Option<String>,
}

impl ProxyQuery {
    fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        if let Some(raw) = raw {
            for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                if value.is_empty() {
                    continue;
                }
                match key.as_ref() {
                    "baseId" => query.base_id = Some(value.into_owned()),
                    "offset" => query.offset = Some(value.into_owned()),
                    _ => {}
                }
            }
        }
        query
    }
}

/// Per-request view of the configuration
struct Invocation<'a> {
    state: &'a AppState,
    settings: DonorSettings,
    base_override: Option<String>,
}

impl<'a> Invocation<'a> {
    fn begin(state: &'a AppState) -> Self {
        Self {
            state,
            settings: DonorSettings::load(state.env.as_ref()),
            base_override: None,
        }
    }

    /// Accept a caller-supplied base id when overrides are enabled
    fn offer_base(&mut self, base_id: Option<&str>) {
        match base_id {
            Some(base) if self.state.config.proxy.allow_base_override => {
                self.base_override = Some(base.to_string());
            }
            Some(_) => debug!("Ignoring caller-supplied baseId; overrides are disabled"),
            None => {}
        }
    }

    fn resolve(&self) -> Result<(UpstreamTarget, AirtableClient)> {
        let target = self.settings.resolve(self.base_override.as_deref())?;
        let client =
            AirtableClient::new(self.state.http_client.clone(), &self.state.api_base, &target)?;
        Ok((target, client))
    }

    fn shape(&self) -> ResponseShape {
        self.state.config.proxy.response_shape
    }

    fn fail(&self, error: Error) -> ProxyFailure {
        error!("Proxy error: {}", error);
        let proxy = &self.state.config.proxy;
        ProxyFailure::new(
            error,
            proxy.error_status,
            proxy.response_shape == ResponseShape::Envelope,
        )
        .with_details(self.settings.details(self.base_override.as_deref()))
    }
}

/// List donor records
#[utoipa::path(
    get,
    path = "/api/airtableProxy",
    params(
        ("baseId" = Option<String>, Query, description = "Base override, honored only when enabled"),
        ("offset" = Option<String>, Query, description = "Pagination cursor from a previous page"),
    ),
    responses(
        (status = 200, description = "Records from the donor table", body = RecordsEnvelope),
        (status = 500, description = "Configuration or upstream failure", body = crate::error::ErrorResponse),
    ),
    tag = "proxy",
)]
pub async fn list_records(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> std::result::Result<Json<Value>, ProxyFailure> {
    let span = info_span!("airtable_proxy", invocation_id = %Uuid::new_v4(), method = "GET");
    list(&state, raw_query).instrument(span).await
}

async fn list(
    state: &AppState,
    raw_query: Option<String>,
) -> std::result::Result<Json<Value>, ProxyFailure> {
    let query = ProxyQuery::parse(raw_query.as_deref());
    let mut invocation = Invocation::begin(state);
    invocation.offer_base(query.base_id.as_deref());

    let (target, client) = invocation.resolve().map_err(|e| invocation.fail(e))?;

    let list_query = ListQuery {
        view: target.view_id,
        max_records: target.max_records,
        offset: query.offset,
    };
    let body = client
        .list_records(&list_query)
        .await
        .map_err(|e| invocation.fail(e))?;

    let records = records_of(&body);
    info!("Fetched {} records", records.len());

    match invocation.shape() {
        ResponseShape::Passthrough => Ok(Json(body)),
        ResponseShape::Envelope => {
            let envelope = RecordsEnvelope {
                success: true,
                records,
                offset: body.get("offset").and_then(Value::as_str).map(str::to_string),
            };
            Ok(Json(json!(envelope)))
        }
    }
}

/// Apply partial updates to donor records
#[utoipa::path(
    post,
    path = "/api/airtableProxy",
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "Updated records", body = RecordsEnvelope),
        (status = 500, description = "Configuration, request or upstream failure", body = crate::error::ErrorResponse),
    ),
    tag = "proxy",
)]
pub async fn update_records(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<Value>, ProxyFailure> {
    let span = info_span!("airtable_proxy", invocation_id = %Uuid::new_v4(), method = "POST");
    update(&state, &body).instrument(span).await
}

async fn update(state: &AppState, body: &[u8]) -> std::result::Result<Json<Value>, ProxyFailure> {
    let parsed = serde_json::from_slice::<UpdateRequest>(body);

    let mut invocation = Invocation::begin(state);
    invocation.offer_base(parsed.as_ref().ok().and_then(|r| r.base_id.as_deref()));

    // Missing configuration wins over a malformed body
    let (_, client) = invocation.resolve().map_err(|e| invocation.fail(e))?;

    let mut request = parsed.map_err(|e| {
        invocation.fail(Error::InvalidRequest {
            message: e.to_string(),
        })
    })?;

    let filter = &state.config.proxy.field_filter;
    for update in &mut request.updates {
        let dropped = update.retain_permitted(filter);
        if !dropped.is_empty() {
            debug!("Dropped fields {:?} from {}", dropped, update.id);
        }
    }

    let mode = state.config.proxy.batching;
    let bodies = client
        .update_in_batches(&request.updates, mode)
        .await
        .map_err(|e| invocation.fail(e))?;

    info!(
        "Updated {} records in {} upstream calls",
        request.updates.len(),
        bodies.len()
    );

    Ok(Json(shape_update_response(invocation.shape(), mode, bodies)))
}

/// Reject anything other than GET and POST
pub async fn method_not_allowed(State(state): State<AppState>, method: Method) -> ProxyFailure {
    let invocation = Invocation::begin(&state);
    invocation.fail(Error::MethodNotAllowed {
        method: method.to_string(),
    })
}

fn shape_update_response(shape: ResponseShape, mode: BatchMode, bodies: Vec<Value>) -> Value {
    match (shape, mode) {
        (ResponseShape::Passthrough, BatchMode::Single) => bodies
            .into_iter()
            .next()
            .unwrap_or_else(|| json!({ "records": [] })),
        (ResponseShape::Passthrough, BatchMode::Chunked { .. }) => {
            json!({ "records": concat_records(&bodies) })
        }
        (ResponseShape::Envelope, _) => json!(RecordsEnvelope {
            success: true,
            records: concat_records(&bodies),
            offset: None,
        }),
    }
}

fn concat_records(bodies: &[Value]) -> Vec<Value> {
    bodies.iter().flat_map(records_of).collect()
}
