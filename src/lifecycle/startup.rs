//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the preference backend named by the storage config
//! - Build the credential set and route table
//! - Surface risky settings (default credential, ambiguous routes)
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::sync::Arc;

use crate::auth::{AuthGate, CredentialSet};
use crate::config::{ServerConfig, StorageConfig};
use crate::http::Dispatcher;
use crate::resources;
use crate::routing::RouteTable;
use crate::store::{BackendError, FileStore, MemoryStore, PreferenceStore, RecordStore};

/// Error type for startup.
#[derive(Debug)]
pub enum StartupError {
    /// The storage file could not be opened or parsed.
    Storage(BackendError),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::Storage(e) => write!(f, "Failed to open storage: {}", e),
        }
    }
}

impl std::error::Error for StartupError {}

/// Open the record store on the configured backend.
pub fn open_store(config: &StorageConfig) -> Result<Arc<RecordStore>, StartupError> {
    let backend: Arc<dyn PreferenceStore> = match &config.path {
        Some(path) => {
            let store = FileStore::open(path).map_err(StartupError::Storage)?;
            tracing::info!(path = %store.path().display(), "Using file-backed storage");
            Arc::new(store)
        }
        None => {
            tracing::info!("Using in-memory storage");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(Arc::new(RecordStore::new(backend)))
}

/// Build the request dispatcher from config and an opened store.
pub fn build_dispatcher(config: &ServerConfig, store: Arc<RecordStore>) -> Dispatcher {
    if config.auth.uses_default_credential() {
        tracing::warn!("Default credential user/pass is enabled; configure auth.credentials");
    }
    let credentials = CredentialSet::new(config.auth.credentials.iter().cloned());

    let routes = RouteTable::new(resources::routes(store));
    for (a, b) in routes.conflicts() {
        tracing::warn!(
            method = %a.method(),
            first = a.path(),
            second = b.path(),
            "Routes can match the same request"
        );
    }
    tracing::info!(routes = routes.len(), credentials = credentials.len(), "Dispatcher ready");

    Dispatcher::new(AuthGate::new(credentials), routes)
}
