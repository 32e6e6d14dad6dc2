//! HTTP module for portal API testing
//!
//! Provides the session carried across the calls of one run.

mod client;

pub use client::{HttpError, HttpRequest, HttpResponse, MultipartBody, Session};
