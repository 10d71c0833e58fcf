//! Per-request pipeline.
//!
//! # Responsibilities
//! - Answer `/` without authentication
//! - Gate every other path on basic auth
//! - Resolve exactly one route and run its handler
//!
//! # Design Decisions
//! - Fully synchronous; runs on a blocking worker to completion
//! - Every outcome is exactly one Response

use axum::http::StatusCode;

use crate::auth::AuthGate;
use crate::http::error::ApiError;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::routing::{Resolution, RouteTable};

/// Body message returned for `/`.
pub const ROOT_GREETING: &str = "congrats, you got it working!";

/// Auth gate plus route table, shared by every worker.
#[derive(Debug)]
pub struct Dispatcher {
    gate: AuthGate,
    routes: RouteTable,
}

impl Dispatcher {
    pub fn new(gate: AuthGate, routes: RouteTable) -> Self {
        Self { gate, routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn dispatch(&self, request: &Request) -> Response {
        let path = request.path();

        if path == "/" {
            return Response::for_status(StatusCode::OK, ROOT_GREETING);
        }

        if !self.gate.authenticate(&request.headers) {
            tracing::warn!(method = %request.method, path = %path, "Authentication failed");
            return ApiError::AuthInvalid.into_response();
        }

        match self.routes.resolve(&request.method, path) {
            Resolution::Matched(route) => {
                tracing::debug!(method = %request.method, path = %path, route = %route.path(), "Route matched");
                route.handle(request)
            }
            Resolution::NoMatch => {
                tracing::warn!(method = %request.method, path = %path, "No route matched");
                ApiError::RouteNotFound.into_response()
            }
            Resolution::Ambiguous(count) => {
                tracing::error!(method = %request.method, path = %path, matches = count, "Route table is ambiguous");
                ApiError::RouteAmbiguous.into_response()
            }
        }
    }
}
