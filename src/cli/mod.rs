//! CLI argument parsing
//!
//! Defines command-line interface using clap. Every flag is optional; with
//! none the full plan runs against the default portal URL.

use clap::Parser;
use std::path::PathBuf;

/// Sequential backend test harness for the government scheme portal
#[derive(Parser, Debug)]
#[command(name = "portal-api-tester")]
#[command(version)]
#[command(about = "Run the ordered portal API test plan and report every result")]
#[command(long_about = None)]
pub struct Args {
    /// Portal API root URL (overrides config and PORTAL_TESTER_BASE_URL)
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Path to a YAML or JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format (text, json, json-pretty, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Pause between test cases in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Also write the report to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exit with status 1 when any test case fails
    #[arg(long)]
    pub strict: bool,

    /// Disable coloured pass/fail markers
    #[arg(long)]
    pub no_color: bool,

    /// List the registered test plan and exit
    #[arg(short, long)]
    pub list: bool,

    /// Write the resolved configuration to this file and exit
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Print supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}
