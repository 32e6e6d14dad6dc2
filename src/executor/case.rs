//! Test case contract
//!
//! A test case performs one logical check against the portal and yields one
//! outcome. State produced by earlier cases travels in [`CheckContext`].

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::http::{HttpError, HttpResponse, Session};
use crate::models::Fixtures;

/// Successful or failed verdict reported by a case
#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Pass(String),
    Fail {
        message: String,
        details: Option<Value>,
    },
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        CheckOutcome::Pass(message.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        CheckOutcome::Fail {
            message: message.into(),
            details: None,
        }
    }

    pub fn fail_with(message: impl Into<String>, details: Value) -> Self {
        CheckOutcome::Fail {
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
impl CheckOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass(_))
    }
}

/// Failures a case can raise while checking the portal
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Request failed: {0}")]
    Transport(#[from] HttpError),

    #[error("HTTP {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("{reason}")]
    MalformedResponse { reason: String, payload: Value },

    #[error("{0}")]
    MissingPrerequisite(String),
}

impl CheckError {
    pub fn unexpected(response: &HttpResponse) -> Self {
        CheckError::UnexpectedStatus {
            status: response.status_code,
            body: response.body.clone(),
        }
    }

    pub fn malformed(reason: impl Into<String>, payload: Value) -> Self {
        CheckError::MalformedResponse {
            reason: reason.into(),
            payload,
        }
    }

    /// Diagnostic payload recorded alongside the failure message
    pub fn details(&self) -> Option<Value> {
        match self {
            CheckError::UnexpectedStatus { body, .. } => Some(Value::String(body.clone())),
            CheckError::MalformedResponse { payload, .. } => Some(payload.clone()),
            CheckError::Transport(_) | CheckError::MissingPrerequisite(_) => None,
        }
    }
}

/// State produced by earlier cases and consumed by later ones
#[derive(Clone, Debug, Default)]
pub struct RunState {
    pub access_token: Option<String>,
    pub family_created: bool,
}

/// Everything a case may read or change while it runs
pub struct CheckContext {
    pub session: Session,
    pub fixtures: Fixtures,
    pub state: RunState,
}

impl CheckContext {
    pub fn new(session: Session, fixtures: Fixtures) -> Self {
        Self {
            session,
            fixtures,
            state: RunState::default(),
        }
    }

    /// Store the token from a successful login in both the state and the session
    pub fn authenticate(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.session.set_bearer_token(token.clone());
        self.state.access_token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.access_token.is_some()
    }
}

/// One named, ordered check against the portal
#[async_trait]
pub trait TestCase: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the case needs the bearer token acquired at login
    fn requires_auth(&self) -> bool {
        false
    }

    async fn run(&self, ctx: &mut CheckContext) -> Result<CheckOutcome, CheckError>;
}

/// Parse a response body as JSON, keeping the raw text as details when it is not
pub fn parse_json(response: &HttpResponse) -> Result<Value, CheckError> {
    response.json().map_err(|e| {
        CheckError::malformed(
            format!("Response is not valid JSON: {e}"),
            Value::String(response.body.clone()),
        )
    })
}

/// Require a 200 response and return its JSON body
pub fn expect_ok_json(response: &HttpResponse) -> Result<Value, CheckError> {
    if !response.is_ok() {
        return Err(CheckError::unexpected(response));
    }
    parse_json(response)
}

/// Read a string field from a JSON object
pub fn str_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

/// Read an array field, treating absence as empty
pub fn array_field<'a>(value: &'a Value, field: &str) -> &'a [Value] {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
