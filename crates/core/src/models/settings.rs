use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::CoreError;

pub const DEFAULT_API_BASE_URL: &str = "https://sarunaskarpovicius.site/api";
pub const DEFAULT_SITE_URL: &str = "https://sarunaskarpovicius.site";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "STOCK_DASHBOARD_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "STOCK_DASHBOARD_TIMEOUT_SECS";
pub const ENV_SITE_URL: &str = "STOCK_DASHBOARD_SITE_URL";
pub const ENV_SESSION_PATH: &str = "STOCK_DASHBOARD_SESSION_PATH";

/// Client configuration: where the API lives and where the session is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL every endpoint path is appended to.
    pub api_base_url: String,

    /// Request timeout. Ignored on wasm32, where the browser decides.
    pub timeout_secs: u64,

    /// Public site URL, used as the sitemap hostname.
    pub site_url: String,

    /// File that persists the session. `None` keeps it in memory only.
    pub session_path: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            site_url: DEFAULT_SITE_URL.to_string(),
            session_path: None,
        }
    }
}

impl ClientSettings {
    /// Defaults overridden by `STOCK_DASHBOARD_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON settings document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Invalid settings JSON: {e}")))?;
        settings.validated()
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            settings.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            settings.timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))
            })?;
        }
        if let Some(url) = lookup(ENV_SITE_URL).filter(|v| !v.trim().is_empty()) {
            settings.site_url = url.trim().to_string();
        }
        if let Some(path) = lookup(ENV_SESSION_PATH).filter(|v| !v.trim().is_empty()) {
            settings.session_path = Some(PathBuf::from(path));
        }
        settings.validated()
    }

    /// Check and normalize: http(s) API URL without trailing slash,
    /// non-zero timeout.
    pub fn validated(mut self) -> Result<Self, CoreError> {
        let trimmed = self.api_base_url.trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "API base URL '{}' must start with http:// or https://",
                self.api_base_url
            )));
        }
        self.api_base_url = trimmed.to_string();
        self.site_url = self.site_url.trim_end_matches('/').to_string();
        if self.timeout_secs == 0 {
            return Err(CoreError::Config("Timeout must be at least 1 second".into()));
        }
        Ok(self)
    }
}
