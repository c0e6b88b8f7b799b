//! Wire types exchanged with browsers and with Airtable

use crate::config::FieldFilter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Partial update of one existing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateRecord {
    /// Airtable record id (`rec...`)
    pub id: String,

    /// Field name to new value
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

impl UpdateRecord {
    /// Drop fields the filter does not permit, returning their names
    pub fn retain_permitted(&mut self, filter: &FieldFilter) -> Vec<String> {
        let dropped: Vec<String> = self
            .fields
            .keys()
            .filter(|name| !filter.permits(name))
            .cloned()
            .collect();

        for name in &dropped {
            self.fields.remove(name);
        }

        dropped
    }
}

/// Body accepted by `POST /api/airtableProxy`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// Base to write to; only honored when base overrides are enabled
    #[serde(default)]
    pub base_id: Option<String>,

    /// Updates in submission order
    pub updates: Vec<UpdateRecord>,
}

/// PATCH body sent to Airtable
#[derive(Debug, Serialize)]
pub(crate) struct PatchBody<'a> {
    pub records: &'a [UpdateRecord],
}

/// Query options for listing records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Saved view to read through
    pub view: Option<String>,

    /// Upper bound on records returned
    pub max_records: Option<u32>,

    /// Pagination cursor from a previous page
    pub offset: Option<String>,
}

impl ListQuery {
    /// Airtable query-string pairs, omitting unset options
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(view) = &self.view {
            params.push(("view", view.clone()));
        }
        if let Some(max) = self.max_records {
            params.push(("maxRecords", max.to_string()));
        }
        if let Some(offset) = &self.offset {
            params.push(("offset", offset.clone()));
        }
        params
    }
}

/// Successful proxy response when enveloping is enabled
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordsEnvelope {
    /// Always true
    pub success: bool,

    /// Records returned or updated by Airtable
    #[schema(value_type = Vec<Object>)]
    pub records: Vec<Value>,

    /// Cursor for the next page, when Airtable reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Extract the human-readable message from an Airtable error payload.
///
/// Airtable reports `{"error": {"type": ..., "message": ...}}` for most
/// failures; some gateways answer with a top-level `message` instead.
pub fn upstream_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Records array of an Airtable response, or empty when absent
pub fn records_of(body: &Value) -> Vec<Value> {
    body.get("records")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
