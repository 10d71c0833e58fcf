//! Decoded inbound request.
//!
//! # Responsibilities
//! - Carry method, URI, headers and the fully buffered body
//! - Extract the record segment and query parameters used for addressing
//!
//! # Design Decisions
//! - Only the path takes part in routing; the query string never does
//! - Repeated query keys keep the last value
//! - The last path segment addresses a record when the path has more than one

use axum::http::{HeaderMap, Method, Uri};

use percent_encoding::percent_decode_str;

use crate::store::Params;

/// A request as handed over by the transport, body already buffered.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: String,
}

impl Request {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            method,
            uri,
            headers,
            body: body.into(),
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> &str {
        self.uri.query().unwrap_or("")
    }

    /// Segment addressing a single record, e.g. `3` in `/persons/3`.
    pub fn record_segment(&self) -> Option<&str> {
        let segments: Vec<&str> = self.path().split('/').skip(1).collect();
        if segments.len() < 2 {
            return None;
        }
        segments.last().copied().filter(|s| !s.is_empty())
    }

    /// Percent-decoded query parameters. A `+` stays a literal plus.
    pub fn query_params(&self) -> Params {
        self.query()
            .trim()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }

    /// Query parameters plus the record segment under `id_field`.
    pub fn address(&self, id_field: &str) -> Params {
        let mut params = self.query_params();
        if let Some(record) = self.record_segment() {
            params.insert(id_field.to_string(), record.to_string());
        }
        params
    }
}

fn decode_component(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
