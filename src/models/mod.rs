//! Data models for portal API testing
//!
//! This module contains the result types and the fixture data used throughout the application.

mod fixtures;
mod test_result;

pub use fixtures::{DocumentFixture, FamilyMember, FamilyProfile, Fixtures, UserFixture};
pub use test_result::{ResultLedger, RunSummary, TestResult, TestStatus};
