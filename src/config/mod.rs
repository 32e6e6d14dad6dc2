//! Configuration module
//!
//! Handles loading and layering configuration: defaults, then a config file,
//! then `PORTAL_TESTER_*` environment variables, then command-line flags.

mod env;

pub use env::{print_env_help, EnvConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::Fixtures;

/// Portal API root used when nothing overrides it
pub const DEFAULT_BASE_URL: &str = "https://schemefinder-2.preview.emergentagent.com/api";

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./portal-tester.yaml",
    "./portal-tester.yml",
    "./.portal-tester.yaml",
    "~/.config/portal-tester/config.yaml",
];

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Portal API root every request path is joined to
    pub base_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Pause between consecutive cases in milliseconds
    pub delay_ms: u64,

    /// Exit non-zero when any case fails
    pub fail_on_failure: bool,

    /// Report format (text, json, json-pretty, summary)
    pub format: String,

    /// Data sent to the portal
    pub fixtures: Fixtures,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            delay_ms: 500,
            fail_on_failure: false,
            format: "text".to_string(),
            fixtures: Fixtures::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;

        let config: Self = if is_yaml(path.as_ref()) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = if is_yaml(path.as_ref()) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Resolve the layered configuration
    ///
    /// An explicit path must exist; otherwise the standard locations are
    /// searched and defaults are used when none is present.
    pub fn resolve(explicit: Option<&Path>, env: &EnvConfig) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.as_ref().map(PathBuf::from))
            .or_else(Self::find);

        let mut config = match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };

        if env.has_any() {
            tracing::debug!("Applying PORTAL_TESTER_* environment overrides");
        }
        env.apply_to(&mut config);
        Ok(config)
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

/// Expand `~` to the home directory
fn expand_path(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
