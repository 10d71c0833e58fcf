//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate credentials (non-empty set, usable usernames)
//! - Validate value ranges (body limit > 0, parseable addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoCredentials,
    EmptyUsername(usize),
    ColonInUsername(String),
    EmptyHost,
    EmptySocketPath,
    ZeroBodyLimit,
    InvalidMetricsAddress(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoCredentials => write!(f, "auth.credentials must not be empty"),
            ValidationError::EmptyUsername(index) => {
                write!(f, "auth.credentials[{}] has an empty username", index)
            }
            ValidationError::ColonInUsername(name) => {
                write!(f, "username '{}' must not contain ':'", name)
            }
            ValidationError::EmptyHost => write!(f, "listener.host must not be empty"),
            ValidationError::EmptySocketPath => write!(f, "listener.unix_socket must not be empty"),
            ValidationError::ZeroBodyLimit => write!(f, "listener.max_body_size must be > 0"),
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address '{}' is not a socket address", addr)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.credentials.is_empty() {
        errors.push(ValidationError::NoCredentials);
    }
    for (index, credential) in config.auth.credentials.iter().enumerate() {
        if credential.username.is_empty() {
            errors.push(ValidationError::EmptyUsername(index));
        } else if credential.username.contains(':') {
            errors.push(ValidationError::ColonInUsername(credential.username.clone()));
        }
    }

    match &config.listener.unix_socket {
        Some(path) if path.as_os_str().is_empty() => errors.push(ValidationError::EmptySocketPath),
        Some(_) => {}
        None if config.listener.host.trim().is_empty() => errors.push(ValidationError::EmptyHost),
        None => {}
    }

    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let metrics = &config.observability;
    if metrics.metrics_enabled && metrics.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(metrics.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
