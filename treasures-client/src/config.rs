//! Client configuration

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Hostnames the production storefront is served from
///
/// The reverse proxy on these hosts forwards `/api` to the backend, so the
/// API is reachable on the same origin.
const PRODUCTION_HOSTS: [&str; 2] = ["kashmiricraft.com", "www.kashmiricraft.com"];

/// Development fallback when nothing else applies
const DEV_BASE_URL: &str = "http://localhost:8000";

/// Environment override for the API base URL
pub const API_URL_ENV: &str = "TREASURES_API_URL";

/// Resolve the API base URL
///
/// Pure function of its inputs: an explicit override wins, a production
/// origin maps to same-origin, anything else falls back to the local
/// development default.
pub fn resolve_base_url(override_url: Option<&str>, origin: Option<&str>) -> String {
    if let Some(url) = override_url {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            return url.to_string();
        }
    }

    if let Some(origin) = origin {
        let origin = origin.trim_end_matches('/');
        let host = origin
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(origin);
        if PRODUCTION_HOSTS.contains(&host) {
            return origin.to_string();
        }
    }

    DEV_BASE_URL.to_string()
}

/// Resolve the base URL from the process environment
pub fn base_url_from_env() -> String {
    let override_url = std::env::var(API_URL_ENV).ok();
    if override_url.is_none() {
        tracing::debug!("{} not set, using development default", API_URL_ENV);
    }
    resolve_base_url(override_url.as_deref(), None)
}

/// Whether the process runs in development mode
///
/// Only affects diagnostic log verbosity, never behavior.
pub fn is_development() -> bool {
    !matches!(
        std::env::var("TREASURES_ENV").as_deref(),
        Ok("production") | Ok("prod")
    )
}

/// Client configuration for connecting to the catalog API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g. "http://localhost:8000")
    pub base_url: String,

    /// Per-attempt request timeout
    pub timeout: Duration,

    /// Timeout for the lightweight health probe
    pub health_timeout: Duration,

    /// Retry policy for the product listing
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Create a new configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            retry: RetryPolicy::default(),
        }
    }

    /// Create a configuration resolved from the process environment
    pub fn from_env() -> Self {
        Self::new(base_url_from_env())
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEV_BASE_URL)
    }
}
