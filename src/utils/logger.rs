//! Diagnostic logging for the harness
//!
//! Report lines go to stdout. Everything emitted through `tracing` goes to
//! stderr, so a JSON report can be piped on without filtering.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Verbosity of harness diagnostics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// `-v` forces debug; otherwise the requested level, falling back to warn
    pub fn resolve(verbose: bool, requested: &str) -> Self {
        if verbose {
            return LogLevel::Debug;
        }
        requested.parse().unwrap_or_default()
    }

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Filter directive limited to this crate; HTTP stack events stay quiet
    pub fn directive(self) -> String {
        format!("portal_api_tester={self}")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("Unknown log level: {other}")),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `level` when set.
pub fn init_logger(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
