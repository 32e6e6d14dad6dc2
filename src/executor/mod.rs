//! Test execution engine
//!
//! Provides the test case contract and the sequential runner.

pub mod case;
mod runner;

pub use case::{CheckContext, CheckError, CheckOutcome, TestCase};
pub use runner::{RunnerError, TestRunner, MISSING_TOKEN_MESSAGE};
