//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with a single catch-all handler
//! - Serve HTTP/1.1 and cleartext HTTP/2 on TCP or a unix socket
//! - Buffer request bodies before dispatch (no streaming)
//! - Run the synchronous dispatcher on the blocking pool
//! - Add transport headers and record request metrics

use axum::{
    body::Body,
    extract::State,
    http::{Request as HttpRequest, StatusCode},
    response::{IntoResponse, Response as HttpResponse},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::http::dispatch::Dispatcher;
use crate::http::error::ApiError;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::net::BoundListener;
use crate::observability::metrics;

/// Application state injected into the catch-all handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_size: usize,
}

/// HTTP front end for the dispatcher.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server around `dispatcher`.
    pub fn new(config: ServerConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let state = AppState {
            dispatcher,
            max_body_size: config.listener.max_body_size,
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// The axum router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until `shutdown` fires.
    pub async fn run(
        self,
        listener: BoundListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %listener.describe(), "HTTP server starting");

        let signal = async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server draining");
        };

        match listener {
            BoundListener::Tcp(listener) => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(signal)
                    .await?
            }
            #[cfg(unix)]
            BoundListener::Unix(listener) => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(signal)
                    .await?
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler: buffer, dispatch, finalize.
async fn dispatch_handler(State(state): State<AppState>, request: HttpRequest<Body>) -> HttpResponse {
    let start_time = Instant::now();
    let stream_id = Uuid::new_v4().to_string();
    let method = request.method().to_string();

    let response = match buffer_request(request, state.max_body_size).await {
        Ok(request) => {
            tracing::debug!(
                stream_id = %stream_id,
                method = %request.method,
                uri = %request.uri,
                body_len = request.body.len(),
                "Dispatching request"
            );
            let dispatcher = Arc::clone(&state.dispatcher);
            match tokio::task::spawn_blocking(move || dispatcher.dispatch(&request)).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(stream_id = %stream_id, error = %e, "Handler panicked");
                    Response::for_status(StatusCode::INTERNAL_SERVER_ERROR, "handler failed")
                }
            }
        }
        Err(err) => err.into_response(),
    };

    metrics::record_request(&method, response.status.as_u16(), start_time);
    response.finalize(&stream_id).into_response()
}

async fn buffer_request(request: HttpRequest<Body>, limit: usize) -> Result<Request, ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
        tracing::warn!(error = %e, limit, "Failed to buffer request body");
        ApiError::BodyRejected
    })?;
    let body = String::from_utf8(bytes.to_vec()).map_err(|_| {
        tracing::warn!("Request body is not valid UTF-8");
        ApiError::BodyRejected
    })?;
    Ok(Request::new(parts.method, parts.uri, parts.headers, body))
}
