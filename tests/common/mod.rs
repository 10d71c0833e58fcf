//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::http::{HeaderMap, HeaderValue, Method};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;

use resource_server::auth::{AuthGate, Credential, CredentialSet};
use resource_server::config::ServerConfig;
use resource_server::http::{Dispatcher, HttpServer, Request};
use resource_server::lifecycle::{build_dispatcher, Shutdown};
use resource_server::routing::{Route, RouteTable};
use resource_server::{net, RecordStore};

pub const USER: &str = "user";
pub const PASS: &str = "pass";

/// A server bound to an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.handle.await;
    }
}

/// Start the full server stack on 127.0.0.1 with an in-memory store.
pub async fn start_server() -> TestServer {
    let mut config = ServerConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;

    let store = Arc::new(RecordStore::in_memory());
    let dispatcher = Arc::new(build_dispatcher(&config, store));
    let listener = net::bind(&config.listener).await.unwrap();
    let base_url = format!("http://{}", listener.describe());

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, dispatcher);
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        base_url,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// `Basic <base64(user:pass)>`.
pub fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)))
}

/// Dispatcher over `routes` accepting the default test credential.
pub fn dispatcher_with(routes: Vec<Route>) -> Dispatcher {
    let credentials = CredentialSet::new([Credential::new(USER, PASS)]);
    Dispatcher::new(AuthGate::new(credentials), RouteTable::new(routes))
}

/// Dispatcher over the person resource with a fresh store.
pub fn person_dispatcher() -> Dispatcher {
    build_dispatcher(&ServerConfig::default(), Arc::new(RecordStore::in_memory()))
}

/// Request carrying the default test credential.
pub fn authed(method: Method, uri: &str, body: &str) -> Request {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        HeaderValue::from_str(&basic_auth(USER, PASS)).unwrap(),
    );
    Request::new(method, uri.parse().unwrap(), headers, body)
}

/// Request with no authorization header.
pub fn anonymous(method: Method, uri: &str, body: &str) -> Request {
    Request::new(method, uri.parse().unwrap(), HeaderMap::new(), body)
}
