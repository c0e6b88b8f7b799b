//! Donor table settings read from the process environment
//!
//! Deployment platforms hand the Airtable credentials to the service as plain
//! environment variables. They are read once per invocation through an
//! [`EnvSource`] so handlers never touch `std::env` directly and tests can
//! inject any combination of present and missing values.

use crate::error::{Error, ErrorDetails, Result};
use std::collections::HashMap;
use std::fmt;

pub const DONOR_TOKEN: &str = "DONOR_TOKEN";
pub const DONOR_ID: &str = "DONOR_ID";
pub const DONOR_TABLE: &str = "DONOR_TABLE";
pub const DONOR_VIEW: &str = "DONOR_VIEW";
pub const DONOR_MAX_RECORDS: &str = "DONOR_MAX_RECORDS";
pub const BLOCS_BIN: &str = "BLOCS_BIN";
pub const JSONBIN_KEY: &str = "JSONBIN_KEY";

/// Source of environment values
pub trait EnvSource: Send + Sync {
    /// Look up a variable; empty values are reported as absent
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// Fixed in-memory environment
#[derive(Debug, Clone, Default)]
pub struct StaticEnv(HashMap<String, String>);

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for StaticEnv {
    fn from(entries: [(K, V); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl EnvSource for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Airtable personal access token; never printed
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw secret, for the Authorization header only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Snapshot of the donor environment for one invocation
#[derive(Debug, Clone, Default)]
pub struct DonorSettings {
    pub token: Option<BearerToken>,
    pub base_id: Option<String>,
    pub table_id: Option<String>,
    pub view_id: Option<String>,
    pub max_records: Option<String>,
    pub blocs_bin: Option<String>,
    pub jsonbin_key: Option<String>,
}

/// Fully resolved upstream table to talk to
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    pub token: BearerToken,
    pub base_id: String,
    pub table_id: String,
    pub view_id: Option<String>,
    pub max_records: Option<u32>,
}

impl DonorSettings {
    /// Read all donor variables from `env`
    pub fn load(env: &dyn EnvSource) -> Self {
        Self {
            token: env.var(DONOR_TOKEN).map(BearerToken::new),
            base_id: env.var(DONOR_ID),
            table_id: env.var(DONOR_TABLE),
            view_id: env.var(DONOR_VIEW),
            max_records: env.var(DONOR_MAX_RECORDS),
            blocs_bin: env.var(BLOCS_BIN),
            jsonbin_key: env.var(JSONBIN_KEY),
        }
    }

    /// True when every required variable is present
    pub fn is_complete(&self) -> bool {
        self.missing(None).is_empty()
    }

    fn missing(&self, base_override: Option<&str>) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.token.is_none() {
            missing.push(DONOR_TOKEN);
        }
        if base_override.is_none() && self.base_id.is_none() {
            missing.push(DONOR_ID);
        }
        if self.table_id.is_none() {
            missing.push(DONOR_TABLE);
        }
        missing
    }

    /// Resolve into an upstream target, failing with every missing name.
    ///
    /// `base_override` replaces `DONOR_ID` and, when given, satisfies it.
    pub fn resolve(&self, base_override: Option<&str>) -> Result<UpstreamTarget> {
        let base_id = base_override
            .map(str::to_string)
            .or_else(|| self.base_id.clone());

        let (Some(token), Some(base_id), Some(table_id)) = (&self.token, base_id, &self.table_id)
        else {
            return Err(Error::MissingSettings {
                missing: self.missing(base_override),
            });
        };

        let max_records = match &self.max_records {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(Error::InvalidSetting {
                        name: DONOR_MAX_RECORDS,
                        value: raw.clone(),
                    })
                }
            },
            None => None,
        };

        Ok(UpstreamTarget {
            token: token.clone(),
            base_id,
            table_id: table_id.clone(),
            view_id: self.view_id.clone(),
            max_records,
        })
    }

    /// Non-secret snapshot for error responses
    pub fn details(&self, base_override: Option<&str>) -> ErrorDetails {
        ErrorDetails {
            base_id: base_override
                .map(str::to_string)
                .or_else(|| self.base_id.clone()),
            table_id: self.table_id.clone(),
            view_id: self.view_id.clone(),
            has_token: self.token.is_some(),
        }
    }
}
