//! HTTP session for portal API testing
//!
//! Wraps a `reqwest` client with the state carried between calls of one run:
//! base URL, default headers, cookie jar and the bearer token acquired at login.

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
    multipart::{Form, Part},
    Client, Method, Url,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// HTTP transport errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("{0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(String),
}

/// Carried HTTP state reused across every call of a run
#[derive(Clone)]
pub struct Session {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
    bearer_token: Option<String>,
    timeout_secs: u64,
}

impl Session {
    /// Create a session rooted at `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .cookie_store(true)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| HttpError::RequestFailed(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            default_headers: HeaderMap::new(),
            bearer_token: None,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add a header sent with every request
    pub fn default_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, HttpError> {
        let header_name = HeaderName::from_bytes(key.as_ref().as_bytes())
            .map_err(|e| HttpError::InvalidHeader(e.to_string()))?;
        let header_value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| HttpError::InvalidHeader(e.to_string()))?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Attach the bearer token to all subsequent requests
    pub fn set_bearer_token(&mut self, token: impl Into<String>) {
        self.bearer_token = Some(token.into());
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Build full URL from a path relative to the base URL
    fn build_url(&self, path: &str) -> Result<Url, HttpError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        };
        Url::parse(&raw).map_err(|e| HttpError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Build a URL whose trailing segments are percent-encoded individually
    pub fn url_with_segments(&self, path: &str, segments: &[&str]) -> Result<Url, HttpError> {
        let mut url = self.build_url(path)?;
        url.path_segments_mut()
            .map_err(|_| HttpError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send HTTP request
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = match request.url {
            RequestUrl::Path(ref path) => self.build_url(path)?,
            RequestUrl::Resolved(ref url) => url.clone(),
        };
        debug!("Sending {} request to {}", request.method, url);

        let mut req_builder = self.client.request(request.method.clone(), url.clone());

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(token) = self.bearer_token() {
            req_builder = req_builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        req_builder = match request.body {
            RequestBody::Empty => req_builder,
            RequestBody::Json(value) => req_builder.json(&value),
            RequestBody::Multipart(body) => req_builder.multipart(body.into_form()?),
        };

        let start = Instant::now();

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                HttpError::Connect {
                    url: url.to_string(),
                    reason: error_chain(&e),
                }
            } else {
                HttpError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();

        let mut response_headers = HashMap::new();
        for (key, value) in response.headers().iter() {
            if let Ok(v) = value.to_str() {
                response_headers.insert(key.to_string(), v.to_string());
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else {
                HttpError::RequestFailed(format!("failed to read response body: {e}"))
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            headers: response_headers,
            body,
            duration_ms,
        })
    }

    /// Convenience method for GET request
    pub async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::get(path)).await
    }

    /// POST with a JSON body
    pub async fn post_json(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<HttpResponse, HttpError> {
        let value =
            serde_json::to_value(body).map_err(|e| HttpError::RequestFailed(e.to_string()))?;
        self.send(HttpRequest::post(path).json(value)).await
    }

    /// POST without a body
    pub async fn post_empty(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::post(path)).await
    }

    /// POST a multipart form
    pub async fn post_multipart(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> Result<HttpResponse, HttpError> {
        self.send(HttpRequest::post(path).multipart(body)).await
    }
}

/// Flatten an error and its sources into one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Target of a request: a path joined to the base URL, or an already built URL
#[derive(Clone, Debug)]
pub enum RequestUrl {
    Path(String),
    Resolved(Url),
}

/// Request body variants supported by the portal API
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

/// HTTP request builder
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: RequestUrl,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            url: RequestUrl::Path(path.into()),
            body: RequestBody::Empty,
        }
    }

    pub fn to_url(method: Method, url: Url) -> Self {
        Self {
            method,
            url: RequestUrl::Resolved(url),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }
}

/// One file part of a multipart form
#[derive(Clone, Debug)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub content: Vec<u8>,
    pub mime: String,
}

/// Multipart form description, turned into a `reqwest` form at send time
#[derive(Clone, Debug, Default)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Vec<u8>>,
        mime: impl Into<String>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            filename: filename.into(),
            content: content.into(),
            mime: mime.into(),
        });
        self
    }

    fn into_form(self) -> Result<Form, HttpError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = Part::bytes(file.content)
                .file_name(file.filename)
                .mime_str(&file.mime)
                .map_err(|e| HttpError::Multipart(e.to_string()))?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// HTTP response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    pub fn body_contains(&self, text: &str) -> bool {
        self.body.contains(text)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
