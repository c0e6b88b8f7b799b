//! Airtable REST client bound to one table

use super::{
    batch,
    types::{upstream_error_message, ListQuery, PatchBody, UpdateRecord},
};
use crate::{
    config::{BatchMode, BearerToken, UpstreamTarget},
    error::{Error, Result},
};
use metrics::{counter, histogram};
use reqwest::{header, Client, Response};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Client for a single Airtable table
#[derive(Debug, Clone)]
pub struct AirtableClient {
    /// Shared HTTP client
    http: Client,

    /// `{api_base}/{base}/{table}`
    table_url: Url,

    /// Bearer token attached to every call
    token: BearerToken,
}

impl AirtableClient {
    /// Create a client for the target table under `api_base`
    pub fn new(http: Client, api_base: &Url, target: &UpstreamTarget) -> Result<Self> {
        let mut table_url = api_base.clone();
        table_url
            .path_segments_mut()
            .map_err(|_| Error::Internal {
                message: format!("Upstream URL {api_base} cannot carry a path"),
            })?
            .pop_if_empty()
            .push(&target.base_id)
            .push(&target.table_id);

        Ok(Self {
            http,
            table_url,
            token: target.token.clone(),
        })
    }

    /// Table endpoint this client talks to
    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    /// List one page of records
    pub async fn list_records(&self, query: &ListQuery) -> Result<Value> {
        debug!("Listing records from {}", self.table_url);

        let started = Instant::now();
        let result = self
            .http
            .get(self.table_url.clone())
            .bearer_auth(self.token.expose())
            .query(&query.params())
            .send()
            .await;

        let outcome = match result {
            Ok(response) => Self::read_json(response, "Fetch").await,
            Err(e) => Err(Error::HttpClient(e)),
        };
        record_call("list", started, outcome.is_ok());
        outcome
    }

    /// Send one PATCH carrying `records`
    pub async fn update_records(&self, records: &[UpdateRecord], operation: &str) -> Result<Value> {
        debug!(
            "Updating {} records in {} ({})",
            records.len(),
            self.table_url,
            operation
        );

        let started = Instant::now();
        let result = self
            .http
            .patch(self.table_url.clone())
            .bearer_auth(self.token.expose())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&PatchBody { records })
            .send()
            .await;

        let outcome = match result {
            Ok(response) => Self::read_json(response, operation).await,
            Err(e) => Err(Error::HttpClient(e)),
        };
        record_call("update", started, outcome.is_ok());

        if outcome.is_ok() {
            counter!("airtable_proxy_records_updated_total").increment(records.len() as u64);
        }
        outcome
    }

    /// Submit `updates` according to `mode`, returning each response body in order.
    ///
    /// Batches are sent one at a time and the first failure aborts the rest.
    /// Batches that already succeeded stay applied upstream; nothing is rolled
    /// back.
    pub async fn update_in_batches(
        &self,
        updates: &[UpdateRecord],
        mode: BatchMode,
    ) -> Result<Vec<Value>> {
        let batches = batch::plan(updates, mode);
        let mut bodies = Vec::with_capacity(batches.len());

        for batch in batches {
            let label = batch.label(mode);
            match self.update_records(batch.records, &label).await {
                Ok(body) => bodies.push(body),
                Err(e) => {
                    if batch.start > 0 {
                        warn!(
                            "{} failed after {} records were already applied upstream",
                            label, batch.start
                        );
                    }
                    return Err(e);
                }
            }
        }

        Ok(bodies)
    }

    /// Decode a successful body or turn a failure status into an upstream error
    async fn read_json(response: Response, operation: &str) -> Result<Value> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Value>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(upstream_error_message)
            .unwrap_or_else(|| format!("{operation} failed: {}", status.as_u16()));

        warn!("Airtable returned {} for {}: {}", status, operation, message);

        Err(Error::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

fn record_call(operation: &'static str, started: Instant, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "airtable_proxy_upstream_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("airtable_proxy_upstream_duration_seconds", "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}
