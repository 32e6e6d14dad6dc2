//! Output formatters for test results
//!
//! Provides live per-result lines, the end-of-run report and JSON output.

use std::io::Write;

use crate::models::{RunSummary, TestResult};

const RULE: &str = "============================================================";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }

    /// Machine-readable formats suppress live progress lines
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }
}

/// Result formatter
#[derive(Clone, Debug)]
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn marker(&self, success: bool) -> &'static str {
        match (success, self.colorize) {
            (true, true) => "\x1b[32m✓ PASS\x1b[0m",
            (false, true) => "\x1b[31m✗ FAIL\x1b[0m",
            (true, false) => "✓ PASS",
            (false, false) => "✗ FAIL",
        }
    }

    fn short_marker(&self, success: bool) -> &'static str {
        match (success, self.colorize) {
            (true, true) => "\x1b[32m✓\x1b[0m",
            (false, true) => "\x1b[31m✗\x1b[0m",
            (true, false) => "✓",
            (false, false) => "✗",
        }
    }

    /// Run banner printed before the first category
    pub fn format_banner(&self, target: &str) -> String {
        format!("Starting Government Scheme Portal Backend Tests\nTesting against: {target}\n{RULE}")
    }

    /// Header printed when a category starts
    pub fn format_category(&self, category: &str) -> String {
        format!("\nTesting {category}:")
    }

    /// Line printed the moment a result is recorded; failures carry details on a second line
    pub fn format_live(&self, result: &TestResult) -> String {
        let mut line = format!(
            "{} {}: {}",
            self.marker(result.success),
            result.name,
            result.message
        );

        if let (false, Some(details)) = (result.success, &result.details) {
            let details = match details {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            line.push_str(&format!("\n   Details: {details}"));
        }

        line
    }

    /// Format the end-of-run report
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Text => self.format_summary_text(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_text(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{RULE}\n"));
        output.push_str(&format!(
            "Test Summary: {}/{} tests passed\n",
            summary.passed, summary.total
        ));

        if summary.is_all_passed() {
            output.push_str("All tests passed! Backend is working correctly.\n");
        } else {
            output.push_str(&format!(
                "{} tests failed. Check the details above.\n",
                summary.failed
            ));
        }

        output.push_str("\nDetailed Test Results:\n");
        for result in &summary.results {
            output.push_str(&format!(
                "{} {}: {}\n",
                self.short_marker(result.success),
                result.name,
                result.message
            ));
        }

        output
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        format!(
            "{}: {}/{} passed ({:.1}%) in {}ms",
            summary.target,
            summary.passed,
            summary.total,
            summary.pass_rate(),
            summary.total_duration_ms
        )
    }

    /// Format the registered plan for `--list`
    pub fn format_plan(&self, plan: &[(String, String)]) -> String {
        let mut output = String::new();
        let mut current_category = "";

        for (index, (category, name)) in plan.iter().enumerate() {
            if category != current_category {
                output.push_str(&format!("\n{category}:\n"));
                current_category = category.as_str();
            }
            output.push_str(&format!("  {:2}. {}\n", index + 1, name));
        }

        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Text)
    }
}

/// Write the report to a file, never colourised
pub fn write_results_to_file(
    path: &str,
    summary: &RunSummary,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_summary(summary);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
