//! Config handler settings

use super::CachePolicy;
use serde::{Deserialize, Serialize};

/// Settings for `GET /api/getEnv`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvHandlerConfig {
    /// Delay before responding, in milliseconds
    pub delay_ms: u64,

    /// Include `donorToken` in the response
    pub expose_token: bool,

    /// Cache-Control policy
    pub cache: CachePolicy,
}

impl Default for EnvHandlerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 50,
            expose_token: false,
            cache: CachePolicy::Revalidate { s_maxage: 60 },
        }
    }
}
