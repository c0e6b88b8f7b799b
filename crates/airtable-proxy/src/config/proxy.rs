//! Data proxy configuration

use super::CachePolicy;
use serde::{Deserialize, Serialize};

/// Airtable rejects PATCH requests carrying more records than this
pub const MAX_RECORDS_PER_REQUEST: usize = 10;

/// Fields the donor board is allowed to edit
pub const DEFAULT_DONOR_FIELDS: [&str; 6] =
    ["Name", "Type", "Relationship", "Loves", "Hates", "Party"];

/// How update lists are submitted upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BatchMode {
    /// Split into groups of `size` and send them one after another
    Chunked { size: usize },

    /// Send every update in one request; callers must respect the upstream limit
    Single,
}

impl Default for BatchMode {
    fn default() -> Self {
        BatchMode::Chunked {
            size: MAX_RECORDS_PER_REQUEST,
        }
    }
}

/// Which update fields are forwarded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FieldFilter {
    /// Forward only the named fields, dropping everything else
    AllowList { fields: Vec<String> },

    /// Forward fields unmodified
    PassThrough,
}

impl Default for FieldFilter {
    fn default() -> Self {
        FieldFilter::AllowList {
            fields: DEFAULT_DONOR_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl FieldFilter {
    /// Whether a field survives filtering
    pub fn permits(&self, field: &str) -> bool {
        match self {
            FieldFilter::AllowList { fields } => fields.iter().any(|f| f == field),
            FieldFilter::PassThrough => true,
        }
    }
}

/// Shape of successful proxy responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Return the upstream payload as received
    Passthrough,

    /// Wrap records as `{ success: true, records: [...] }`
    Envelope,
}

/// How failures map to HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatusPolicy {
    /// Every failure is a 500
    Uniform,

    /// 400 / 405 / 502 / 500 depending on the failure kind
    Semantic,
}

/// Data proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Honor a caller-supplied `baseId` over `DONOR_ID`
    pub allow_base_override: bool,

    /// Response shape for successful calls
    pub response_shape: ResponseShape,

    /// Status code mapping for failures
    pub error_status: ErrorStatusPolicy,

    /// Cache-Control policy
    pub cache: CachePolicy,

    /// Update submission strategy
    pub batching: BatchMode,

    /// Update field filter
    pub field_filter: FieldFilter,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allow_base_override: false,
            response_shape: ResponseShape::Envelope,
            error_status: ErrorStatusPolicy::Uniform,
            cache: CachePolicy::NoStore,
            batching: BatchMode::default(),
            field_filter: FieldFilter::default(),
        }
    }
}
