//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::auth::Credential;

/// Root configuration for the resource server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (host/port or unix socket).
    pub listener: ListenerConfig,

    /// Basic-auth credentials.
    pub auth: AuthConfig,

    /// Where record collections are persisted.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host name or IP address (e.g., "::1", "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,

    /// Unix domain socket path. Takes precedence over host/port.
    pub unix_socket: Option<PathBuf>,

    /// Maximum buffered request body, in bytes.
    pub max_body_size: usize,
}

pub const DEFAULT_HOST: &str = "::1";
pub const DEFAULT_PORT: u16 = 8889;

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            unix_socket: None,
            max_body_size: 2 * 1024 * 1024,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Allowed (username, password) pairs.
    pub credentials: Vec<Credential>,
}

impl AuthConfig {
    /// True when the built-in development credential is accepted.
    pub fn uses_default_credential(&self) -> bool {
        let default = default_credential();
        self.credentials.iter().any(|c| *c == default)
    }
}

fn default_credential() -> Credential {
    Credential::new("user", "pass")
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials: vec![default_credential()],
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the preference store. In-memory when absent.
    pub path: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
