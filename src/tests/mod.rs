//! Portal backend test implementations
//!
//! This module contains the 10 test cases run against the scheme portal API.
//!
//! ## Test Categories
//!
//! ### User Authentication
//! - User Registration
//! - User Login
//! - Get Current User
//!
//! ### Family Management
//! - Family Creation
//! - Get Family
//!
//! ### Document Upload
//! - Document Upload
//!
//! ### AI Eligibility Engine
//! - AI Eligibility Check
//! - Get Eligible Schemes
//!
//! ### Scheme Applications
//! - Scheme Application
//!
//! ### Notifications
//! - Notifications System
//!
//! Order matters: login must precede every authenticated case.


pub use applications::SchemeApplicationTest;
pub use auth::{CurrentUserTest, UserLoginTest, UserRegistrationTest};
pub use documents::DocumentUploadTest;
pub use eligibility::{EligibilityCheckTest, EligibleSchemesTest};
pub use family::{FamilyCreationTest, GetFamilyTest};
pub use notifications::NotificationsTest;

use crate::executor::{RunnerError, TestCase, TestRunner};

/// Register the full portal plan in dependency order
pub fn register_default_plan(runner: &mut TestRunner) -> Result<(), RunnerError> {
    runner
        .register(
            "User Authentication",
            vec![
                Box::new(UserRegistrationTest) as Box<dyn TestCase>,
                Box::new(UserLoginTest),
                Box::new(CurrentUserTest),
            ],
        )?
        .register(
            "Family Management",
            vec![
                Box::new(FamilyCreationTest) as Box<dyn TestCase>,
                Box::new(GetFamilyTest),
            ],
        )?
        .register(
            "Document Upload",
            vec![Box::new(DocumentUploadTest) as Box<dyn TestCase>],
        )?
        .register(
            "AI Eligibility Engine",
            vec![
                Box::new(EligibilityCheckTest) as Box<dyn TestCase>,
                Box::new(EligibleSchemesTest),
            ],
        )?
        .register(
            "Scheme Applications",
            vec![Box::new(SchemeApplicationTest) as Box<dyn TestCase>],
        )?
        .register(
            "Notifications",
            vec![Box::new(NotificationsTest) as Box<dyn TestCase>],
        )?;

    Ok(())
}

#[cfg(test)]
pub(crate) fn test_context(base_url: &str) -> crate::executor::CheckContext {
    let session = crate::http::Session::new(base_url, 5).unwrap();
    crate::executor::CheckContext::new(session, crate::models::Fixtures::default())
}

#[cfg(test)]
mod plan_tests {
    use super::*;
    use crate::executor::MISSING_TOKEN_MESSAGE;
    use crate::output::ResultFormatter;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PLAN_ORDER: [&str; 10] = [
        "User Registration",
        "User Login",
        "Get Current User",
        "Family Creation",
        "Get Family",
        "Document Upload",
        "AI Eligibility Check",
        "Get Eligible Schemes",
        "Scheme Application",
        "Notifications System",
    ];

    fn runner(base_url: &str) -> TestRunner {
        let mut runner = TestRunner::new(test_context(base_url))
            .with_delay(Duration::ZERO)
            .with_formatter(ResultFormatter::default().no_color())
            .live_output(false);
        register_default_plan(&mut runner).unwrap();
        runner
    }

    fn schemes() -> serde_json::Value {
        json!({"schemes": [
            {"scheme_name": "PM-KISAN", "status": "Eligible"},
            {"scheme_name": "MGNREGA", "status": "Eligible"},
            {"scheme_name": "PM-JAY", "status": "Not Eligible"},
            {"scheme_name": "PMAY-Gramin", "status": "Eligible"},
            {"scheme_name": "Jan Aushadhi", "status": "Eligible"}
        ]})
    }

    fn bearer() -> wiremock::matchers::HeaderExactMatcher {
        header("authorization", "Bearer jwt-token")
    }

    async fn mount_portal(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "email": "rajesh.kumar@gmail.com", "username": "rajesh_kumar"
            })))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"detail": "Username or email already exists"})),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "jwt-token", "token_type": "bearer"
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(bearer())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "username": "rajesh_kumar"
            })))
            .mount(server)
            .await;
        Mock::given(path("/family"))
            .and(bearer())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "family_head_name": "Rajesh Kumar Singh", "family_members": []
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/upload-document"))
            .and(bearer())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "filename": "aadhaar_card.txt", "message": "Document uploaded successfully"
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/check-eligibility"))
            .and(bearer())
            .respond_with(ResponseTemplate::new(200).set_body_json(schemes()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/eligible-schemes"))
            .and(bearer())
            .respond_with(ResponseTemplate::new(200).set_body_json(schemes()))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/apply-scheme/PM-KISAN"))
            .and(bearer())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Application submitted"
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .and(bearer())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "notifications": [{"id": "n-1", "read": false}]
            })))
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/notifications/n-1/read"))
            .and(bearer())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(server)
            .await;
    }

    #[test]
    fn test_default_plan_order() {
        let runner = runner("http://127.0.0.1:9");
        let names: Vec<String> = runner.list_plan().into_iter().map(|(_, n)| n).collect();
        assert_eq!(names, PLAN_ORDER);
        assert_eq!(runner.case_count(), 10);
    }

    #[tokio::test]
    async fn test_full_plan_passes_against_healthy_portal() {
        let server = MockServer::start().await;
        mount_portal(&server).await;

        let mut runner = runner(&server.uri());
        let summary = runner.run().await;

        let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, PLAN_ORDER);
        assert!(summary.is_all_passed(), "{:#?}", summary.results);
        assert_eq!(
            summary.result("AI Eligibility Check").unwrap().message,
            "Eligibility check completed. 4 eligible schemes found"
        );
        assert_eq!(
            summary.result("Scheme Application").unwrap().message,
            "Successfully applied to PM-KISAN"
        );
        assert!(runner.context().state.family_created);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let server = MockServer::start().await;
        mount_portal(&server).await;

        let first = runner(&server.uri()).run().await;
        let second = runner(&server.uri()).run().await;

        let pattern = |s: &crate::models::RunSummary| -> Vec<bool> {
            s.results.iter().map(|r| r.success).collect()
        };
        assert_eq!(pattern(&first), pattern(&second));
        assert_eq!(
            second.result("User Registration").unwrap().message,
            "User already exists (expected for repeat tests)"
        );
    }

    #[tokio::test]
    async fn test_failed_login_blocks_authenticated_cases() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(ResponseTemplate::new(400).set_body_string("already exists"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect password"))
            .mount(&server)
            .await;

        let summary = runner(&server.uri()).run().await;

        assert_eq!(summary.total, 10);
        assert_eq!(summary.passed, 1);
        let login = summary.result("User Login").unwrap();
        assert_eq!(login.message, "HTTP 401");
        for result in summary.results.iter().skip(2) {
            assert!(!result.success);
            assert_eq!(result.message, MISSING_TOKEN_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_unreachable_portal_still_completes() {
        let summary = runner("http://127.0.0.1:9").run().await;

        assert_eq!(summary.total, 10);
        assert_eq!(summary.passed, 0);
        assert!(summary.results[0].message.starts_with("Request failed:"));
    }
}
