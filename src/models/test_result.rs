//! Test result models for portal API testing
//!
//! Defines per-case results, the insertion-ordered result ledger and the run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of a single test case execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub category: String,
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub duration_ms: u64,
}

impl TestResult {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
            success: true,
            message: message.into(),
            details: None,
            duration_ms: 0,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: String::new(),
            success: false,
            message: message.into(),
            details: None,
            duration_ms: 0,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Details are kept only on failed results
    pub fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.details = if self.success { None } else { details };
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn status(&self) -> TestStatus {
        if self.success {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status().symbol(), self.name, self.message)
    }
}

/// Ordered mapping from test name to result
///
/// Iteration follows first insertion. Recording a name again replaces the
/// entry in place, so the ledger never holds two results for one test.
#[derive(Clone, Debug, Default)]
pub struct ResultLedger {
    results: Vec<TestResult>,
    index: HashMap<String, usize>,
}

impl ResultLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: TestResult) {
        match self.index.get(&result.name) {
            Some(&pos) => self.results[pos] = result,
            None => {
                self.index.insert(result.name.clone(), self.results.len());
                self.results.push(result);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<TestResult> {
        self.results
    }
}

/// Summary of one complete run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl RunSummary {
    pub fn new(
        target: impl Into<String>,
        started_at: DateTime<Utc>,
        passed: usize,
        ledger: ResultLedger,
    ) -> Self {
        let total = ledger.len();
        let results = ledger.into_results();
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            target: target.into(),
            started_at,
            total,
            passed,
            failed: total - passed,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }

}

#[cfg(test)]
impl RunSummary {
    pub fn result(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_creation() {
        let result = TestResult::pass("User Login", "Login successful").with_duration(42);
        assert_eq!(result.status(), TestStatus::Pass);
        assert_eq!(result.duration_ms, 42);
        assert_eq!(result.to_string(), "✓ User Login: Login successful");
    }

    #[test]
    fn test_details_dropped_on_success() {
        let passed = TestResult::pass("a", "ok").with_details(Some(json!({"x": 1})));
        assert!(passed.details.is_none());

        let failed = TestResult::fail("b", "HTTP 500").with_details(Some(json!("boom")));
        assert_eq!(failed.details, Some(json!("boom")));
    }

    #[test]
    fn test_ledger_keeps_insertion_order() {
        let mut ledger = ResultLedger::new();
        ledger.record(TestResult::pass("User Registration", "ok"));
        ledger.record(TestResult::fail("User Login", "HTTP 401"));
        ledger.record(TestResult::pass("Get Current User", "ok"));

        let results = ledger.into_results();
        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["User Registration", "User Login", "Get Current User"]);
        assert_eq!(results.iter().filter(|r| r.success).count(), 2);
    }

    #[test]
    fn test_ledger_record_is_idempotent_by_name() {
        let mut ledger = ResultLedger::new();
        ledger.record(TestResult::fail("Get Family", "No family profile found"));
        ledger.record(TestResult::pass("Notifications System", "ok"));
        ledger.record(TestResult::pass("Get Family", "Family profile retrieved successfully"));

        assert_eq!(ledger.len(), 2);
        let results = ledger.into_results();
        assert_eq!(results[0].name, "Get Family");
        assert!(results[0].success);
    }

    #[test]
    fn test_run_summary() {
        let mut ledger = ResultLedger::new();
        ledger.record(TestResult::pass("a", "ok").with_duration(10));
        ledger.record(TestResult::fail("b", "HTTP 500").with_duration(5));

        let summary = RunSummary::new("http://localhost/api", Utc::now(), 1, ledger);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_duration_ms, 15);
        assert_eq!(summary.pass_rate(), 50.0);
        assert!(!summary.is_all_passed());
        assert!(summary.result("b").is_some());
    }

    #[test]
    fn test_summary_serializes_without_empty_details() {
        let mut ledger = ResultLedger::new();
        ledger.record(TestResult::pass("a", "ok"));
        let summary = RunSummary::new("t", Utc::now(), 1, ledger);

        let value = serde_json::to_value(&summary).unwrap();
        assert!(value["results"][0].get("details").is_none());
        assert_eq!(value["results"][0]["success"], true);
    }
}
