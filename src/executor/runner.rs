//! Test execution runner
//!
//! Executes registered categories and their cases strictly in registration order.

use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::case::{CheckContext, CheckOutcome, TestCase};
use crate::models::{ResultLedger, RunSummary, TestResult};
use crate::output::ResultFormatter;
use crate::utils::Timer;

/// Message recorded for bearer-protected cases when login never succeeded
pub const MISSING_TOKEN_MESSAGE: &str =
    "No access token available (login did not succeed); skipping authenticated request";

/// Registration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunnerError {
    #[error("Duplicate test name: {0}")]
    DuplicateTestName(String),
}

struct Category {
    name: String,
    cases: Vec<Box<dyn TestCase>>,
}

/// Sequential runner owning the session context and the result ledger
pub struct TestRunner {
    categories: Vec<Category>,
    names: HashSet<String>,
    ctx: CheckContext,
    ledger: ResultLedger,
    delay: Duration,
    formatter: ResultFormatter,
    live_output: bool,
}

impl TestRunner {
    /// Create a new test runner around an explicit context
    pub fn new(ctx: CheckContext) -> Self {
        Self {
            categories: Vec::new(),
            names: HashSet::new(),
            ctx,
            ledger: ResultLedger::new(),
            delay: Duration::from_millis(500),
            formatter: ResultFormatter::default(),
            live_output: true,
        }
    }

    /// Pause inserted between consecutive cases
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_formatter(mut self, formatter: ResultFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Print one line per result as soon as it is recorded
    pub fn live_output(mut self, enabled: bool) -> Self {
        self.live_output = enabled;
        self
    }

    /// Append a category and its ordered cases to the plan
    pub fn register(
        &mut self,
        category: impl Into<String>,
        cases: Vec<Box<dyn TestCase>>,
    ) -> Result<&mut Self, RunnerError> {
        let mut incoming = HashSet::new();
        for case in &cases {
            let name = case.name();
            if self.names.contains(name) || !incoming.insert(name.to_string()) {
                return Err(RunnerError::DuplicateTestName(name.to_string()));
            }
        }

        self.names.extend(incoming);
        self.categories.push(Category {
            name: category.into(),
            cases,
        });
        Ok(self)
    }

    pub fn case_count(&self) -> usize {
        self.categories.iter().map(|c| c.cases.len()).sum()
    }

    /// Registered `(category, test name)` pairs in execution order
    pub fn list_plan(&self) -> Vec<(String, String)> {
        self.categories
            .iter()
            .flat_map(|c| {
                c.cases
                    .iter()
                    .map(move |case| (c.name.clone(), case.name().to_string()))
            })
            .collect()
    }

    pub fn context(&self) -> &CheckContext {
        &self.ctx
    }

    /// Record a result and echo it when live output is on
    pub fn log_result(&mut self, result: TestResult) -> bool {
        let success = result.success;

        if success {
            info!("PASS {}: {}", result.name, result.message);
        } else {
            warn!("FAIL {}: {}", result.name, result.message);
        }

        if self.live_output {
            println!("{}", self.formatter.format_live(&result));
        }

        self.ledger.record(result);
        success
    }

    /// Run every registered case and return the full ledger as a summary
    pub async fn run(&mut self) -> RunSummary {
        let target = self.ctx.session.base_url().to_string();
        let started_at = Utc::now();
        let total = self.case_count();

        info!("Starting run of {} cases against {}", total, target);
        if self.live_output {
            println!("{}", self.formatter.format_banner(&target));
        }

        self.ledger = ResultLedger::new();
        let categories = std::mem::take(&mut self.categories);
        let mut executed = 0;
        let mut passed = 0;

        for category in &categories {
            info!("Testing {}", category.name);
            if self.live_output {
                println!("{}", self.formatter.format_category(&category.name));
            }

            for case in &category.cases {
                let timer = Timer::start(case.name());
                let result = execute(case.as_ref(), &mut self.ctx)
                    .await
                    .with_category(&category.name)
                    .with_duration(timer.stop().as_millis() as u64);

                if self.log_result(result) {
                    passed += 1;
                }

                executed += 1;
                if executed < total && !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
            }
        }

        self.categories = categories;

        if self.ledger.is_empty() {
            warn!("No test cases registered against {}", target);
        }

        let summary = RunSummary::new(target, started_at, passed, self.ledger.clone());
        info!(
            "Run completed in {}ms - Pass: {}/{} ({:.1}%)",
            summary.total_duration_ms,
            summary.passed,
            summary.total,
            summary.pass_rate()
        );
        summary
    }
}

/// Execute one case, converting every failure mode into a failed result
async fn execute(case: &dyn TestCase, ctx: &mut CheckContext) -> TestResult {
    let name = case.name();

    if case.requires_auth() && !ctx.is_authenticated() {
        return TestResult::fail(name, MISSING_TOKEN_MESSAGE);
    }

    match AssertUnwindSafe(case.run(ctx)).catch_unwind().await {
        Ok(Ok(CheckOutcome::Pass(message))) => TestResult::pass(name, message),
        Ok(Ok(CheckOutcome::Fail { message, details })) => {
            TestResult::fail(name, message).with_details(details)
        }
        Ok(Err(err)) => TestResult::fail(name, err.to_string()).with_details(err.details()),
        Err(panic) => TestResult::fail(
            name,
            format!("Unhandled failure: {}", panic_message(panic.as_ref())),
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
