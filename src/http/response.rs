//! Response construction.
//!
//! # Responsibilities
//! - Build plain-text status responses (`<reason>: <message>`)
//! - Encode record sequences as pretty-printed JSON
//! - Add transport headers (content-length, etag, stream id) at the boundary
//!
//! # Design Decisions
//! - Responses are wire-agnostic until `finalize` is called
//! - The etag is a hex SHA-256 of the body, so equal bodies share a tag

use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::http::error::ApiError;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";
pub const X_STREAM_ID: &str = "x-stream-id";

/// Status, headers and body of an outgoing response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    /// Plain-text response whose body is `"<reason phrase>: <message>"`.
    pub fn for_status(status: StatusCode, message: &str) -> Self {
        let body = if message.is_empty() {
            String::new()
        } else {
            format!("{}: {}", status.canonical_reason().unwrap_or(""), message)
        };
        Self {
            status,
            headers: content_type(TEXT_PLAIN),
            body,
        }
    }

    /// 200 with the pretty-printed JSON encoding of `value`.
    pub fn for_records<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(body) => Self {
                status: StatusCode::OK,
                headers: content_type(APPLICATION_JSON),
                body,
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode response body");
                ApiError::EncodeFailed.into_response()
            }
        }
    }

    /// 401 challenge with an empty body.
    pub fn unauthorized() -> Self {
        let mut headers = content_type(TEXT_PLAIN);
        headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("basic"));
        Self {
            status: StatusCode::UNAUTHORIZED,
            headers,
            body: String::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Add the headers owned by the transport boundary.
    pub fn finalize(mut self, stream_id: &str) -> Self {
        self.headers.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        if let Ok(tag) = HeaderValue::from_str(&etag(&self.body)) {
            self.headers.insert(ETAG, tag);
        }
        if let Ok(id) = HeaderValue::from_str(stream_id) {
            self.headers.insert(HeaderName::from_static(X_STREAM_ID), id);
        }
        self
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let mut response = axum::response::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Quoted hex SHA-256 of `body`.
pub fn etag(body: &str) -> String {
    format!("\"{:x}\"", Sha256::digest(body.as_bytes()))
}

fn content_type(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
    headers
}
