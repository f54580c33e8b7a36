//! TOML configuration for the runs dashboard.
//!
//! Layered the same way at every entry point: an explicit path, then the
//! `RUNS_DASHBOARD_CONFIG` environment variable, then `./runs-dashboard.toml`,
//! then compiled-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dashboard::rows::Layout;

/// Environment variable naming a config file to load.
pub const CONFIG_ENV_VAR: &str = "RUNS_DASHBOARD_CONFIG";

/// Config file picked up from the working directory when nothing else is set.
pub const LOCAL_CONFIG_FILE: &str = "runs-dashboard.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded dashboard configuration");
        Ok(config)
    }

    /// Try to load configuration from, in order:
    /// 1. The path specified by the `RUNS_DASHBOARD_CONFIG` environment variable.
    /// 2. `runs-dashboard.toml` in the working directory.
    /// 3. Fall back to compiled-in defaults.
    pub fn load_or_default() -> Self {
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let path = Path::new(&env_path);
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "RUNS_DASHBOARD_CONFIG set but file could not be loaded, trying fallback"
                    );
                }
            }
        }

        let local_path = Path::new(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            match Self::load(local_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %local_path.display(),
                        error = %e,
                        "local config file exists but could not be loaded, using defaults"
                    );
                }
            }
        }

        debug!("no config file found, using compiled-in defaults");
        Self::default()
    }

    /// Load from `path` when given (failures are fatal), otherwise fall back
    /// to [`DashboardConfig::load_or_default`].
    pub fn resolve(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::load_or_default()),
        }
    }
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

/// Where the runs API lives and how to query it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and port of the test management API.
    pub base_url: String,
    /// Path of the runs collection, appended to `base_url`.
    pub runs_path: String,
    /// Request timeout. Unset means the transport default.
    pub timeout_secs: Option<u64>,
    /// Only show runs with this status (sent as `?status=`).
    pub status: Option<String>,
    /// Only show runs for this environment (sent as `?environment=`).
    pub environment: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            runs_path: "/api/runs".to_string(),
            timeout_secs: None,
            status: None,
            environment: None,
        }
    }
}

impl ApiConfig {
    /// Full URL of the runs endpoint, without query parameters.
    pub fn runs_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.runs_path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Query parameters to send with the runs request.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            query.push(("status", status.to_string()));
        }
        if let Some(env) = self.environment.as_deref().filter(|e| !e.is_empty()) {
            query.push(("environment", env.to_string()));
        }
        query
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// How rows are laid out and formatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub layout: Layout,
    /// chrono `strftime` pattern applied in the local time zone.
    pub time_format: String,
    /// `id` attribute of the emitted `<tbody>`.
    pub element_id: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Canonical,
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            element_id: "runs-table-body".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
