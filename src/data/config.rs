//! Service configuration for the network collaborators.
//!
//! Clients never read the environment themselves. The application boundary
//! builds a `ServiceConfig` (usually via `from_env`) and hands it to each
//! client constructor, which keeps the clients testable with fixed values.

use std::time::Duration;

pub const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_FMP_BASE_URL: &str = "https://financialmodelingprep.com";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct ServiceConfig {
    pub mistral_api_key: Option<String>,
    pub fmp_api_key: Option<String>,
    pub mistral_base_url: String,
    pub mistral_model: String,
    pub fmp_base_url: String,
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mistral_api_key: None,
            fmp_api_key: None,
            mistral_base_url: DEFAULT_MISTRAL_BASE_URL.to_string(),
            mistral_model: DEFAULT_MISTRAL_MODEL.to_string(),
            fmp_base_url: DEFAULT_FMP_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let timeout = get("DCF_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            mistral_api_key: get("MISTRAL_API_KEY"),
            fmp_api_key: get("FMP_API_KEY"),
            mistral_base_url: get("MISTRAL_BASE_URL").unwrap_or(defaults.mistral_base_url),
            mistral_model: get("MISTRAL_MODEL").unwrap_or(defaults.mistral_model),
            fmp_base_url: get("FMP_BASE_URL").unwrap_or(defaults.fmp_base_url),
            timeout,
        }
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are reported as present/absent only.
        f.debug_struct("ServiceConfig")
            .field("mistral_api_key", &self.mistral_api_key.as_ref().map(|_| "<set>"))
            .field("fmp_api_key", &self.fmp_api_key.as_ref().map(|_| "<set>"))
            .field("mistral_base_url", &self.mistral_base_url)
            .field("mistral_model", &self.mistral_model)
            .field("fmp_base_url", &self.fmp_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
