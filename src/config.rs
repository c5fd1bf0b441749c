//! API endpoint configuration.

/// Default development origin, including the versioned API prefix.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Environment variable consulted on native targets.
pub const BASE_URL_ENV: &str = "WAYFARE_API_URL";

/// Remote API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Build a config for an explicit base URL. A trailing slash is
    /// stripped so endpoint joining stays predictable.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Resolve the base URL from the environment, falling back to the
    /// local development origin. Browsers have no process environment,
    /// so the wasm build always uses the default (override via `new`).
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                return Self::new(url);
            }
        }
        Self::new(DEFAULT_BASE_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path onto the base URL.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
