//! Cache-Control policy

use super::ConfigError;
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

/// Freshness policy advertised to shared caches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CachePolicy {
    /// Allow shared caching for `s_maxage` seconds, revalidating in the background
    Revalidate { s_maxage: u64 },

    /// Never cache
    NoStore,
}

impl CachePolicy {
    /// Render as a Cache-Control header value
    pub fn directive(&self) -> String {
        match self {
            CachePolicy::Revalidate { s_maxage } => {
                format!("s-maxage={s_maxage}, stale-while-revalidate")
            }
            CachePolicy::NoStore => "no-store, max-age=0".to_string(),
        }
    }

    pub fn header_value(&self, field: &str) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.directive()).map_err(|e| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives() {
        assert_eq!(
            CachePolicy::Revalidate { s_maxage: 60 }.directive(),
            "s-maxage=60, stale-while-revalidate"
        );
        assert_eq!(CachePolicy::NoStore.directive(), "no-store, max-age=0");
    }
}
