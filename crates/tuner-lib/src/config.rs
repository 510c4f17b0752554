//! Telemetry provider configuration
//!
//! Credentials come from the process environment (`DD_API_KEY`, `DD_APP_KEY`,
//! optional `DD_SITE`) and are resolved once at startup, before any query is
//! dispatched.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::AnalysisError;

/// Datadog site used when none is configured
pub const DEFAULT_SITE: &str = "datadoghq.com";

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable prefix for provider settings
const ENV_PREFIX: &str = "DD";

/// Provider connection settings
#[derive(Clone)]
pub struct TelemetryConfig {
    pub api_key: String,
    pub app_key: String,
    /// Site such as `datadoghq.eu`, or a full base URL
    pub site: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for TelemetryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryConfig")
            .field("api_key", &"<redacted>")
            .field("app_key", &"<redacted>")
            .field("site", &self.site)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    api_key: Option<String>,
    app_key: Option<String>,
    site: Option<String>,
}

impl TelemetryConfig {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load settings from an explicit variable map (`DD_API_KEY`, ...)
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, AnalysisError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(source: config::Environment) -> Result<Self, AnalysisError> {
        let raw: RawSettings = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AnalysisError::MissingCredentials(e.to_string()))?;

        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let api_key = non_empty(raw.api_key);
        let app_key = non_empty(raw.app_key);

        let mut missing = Vec::new();
        if api_key.is_none() {
            missing.push("DD_API_KEY");
        }
        if app_key.is_none() {
            missing.push("DD_APP_KEY");
        }
        let (Some(api_key), Some(app_key)) = (api_key, app_key) else {
            return Err(AnalysisError::MissingCredentials(format!(
                "{} must be set",
                missing.join(" and ")
            )));
        };

        Ok(Self {
            api_key,
            app_key,
            site: non_empty(raw.site).unwrap_or_else(|| DEFAULT_SITE.to_string()),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the site (e.g. from `--site`)
    pub fn with_site(mut self, site: Option<String>) -> Self {
        if let Some(site) = site.filter(|s| !s.trim().is_empty()) {
            self.site = site;
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base API URL for the configured site
    pub fn base_url(&self) -> Result<Url, AnalysisError> {
        let site = self.site.trim().trim_end_matches('/');
        let raw = if site.starts_with("http://") || site.starts_with("https://") {
            format!("{}/", site)
        } else {
            format!("https://api.{}/", site)
        };
        Url::parse(&raw).map_err(|e| {
            AnalysisError::InvalidConfig(format!("invalid site `{}`: {}", self.site, e))
        })
    }
}
