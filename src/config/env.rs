//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

use super::AppConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "PORTAL_TESTER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Base URL from PORTAL_TESTER_BASE_URL
    pub base_url: Option<String>,
    /// Timeout from PORTAL_TESTER_TIMEOUT
    pub timeout: Option<u64>,
    /// Delay between cases from PORTAL_TESTER_DELAY_MS
    pub delay_ms: Option<u64>,
    /// Strict exit code from PORTAL_TESTER_STRICT
    pub strict: Option<bool>,
    /// Output format from PORTAL_TESTER_FORMAT
    pub format: Option<String>,
    /// Config file from PORTAL_TESTER_CONFIG
    pub config_file: Option<String>,
    /// Verbose from PORTAL_TESTER_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            base_url: get_env("BASE_URL"),
            timeout: get_env_parse("TIMEOUT"),
            delay_ms: get_env_parse("DELAY_MS"),
            strict: get_env_bool("STRICT"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.base_url.is_some()
            || self.timeout.is_some()
            || self.delay_ms.is_some()
            || self.strict.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
    }

    /// Overlay every variable that is set onto `config`
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        if let Some(strict) = self.strict {
            config.fail_on_failure = strict;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all PORTAL_TESTER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_BASE_URL    Portal API root URL");
    println!("  {ENV_PREFIX}_TIMEOUT     Request timeout in seconds");
    println!("  {ENV_PREFIX}_DELAY_MS    Pause between test cases in milliseconds");
    println!("  {ENV_PREFIX}_STRICT      Exit non-zero when a case fails (true/false)");
    println!("  {ENV_PREFIX}_FORMAT      Output format (text, json, json-pretty, summary)");
    println!("  {ENV_PREFIX}_CONFIG      Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE     Enable verbose output (true/false)");
}
