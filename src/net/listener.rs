//! Listener binding for TCP and unix domain sockets.

use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::net::UnixListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to address.
    Bind(String, std::io::Error),
    /// Unix sockets requested on a platform without them.
    Unsupported(PathBuf),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(target, e) => write!(f, "Failed to bind {}: {}", target, e),
            ListenerError::Unsupported(path) => {
                write!(f, "Unix sockets are not supported here: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ListenerError {}

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindTarget {
    Ip { host: String, port: u16 },
    UnixSocket(PathBuf),
}

impl BindTarget {
    pub fn from_config(config: &ListenerConfig) -> Self {
        match &config.unix_socket {
            Some(path) => BindTarget::UnixSocket(path.clone()),
            None => BindTarget::Ip {
                host: config.host.clone(),
                port: config.port,
            },
        }
    }
}

impl std::fmt::Display for BindTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindTarget::Ip { host, port } if host.contains(':') => write!(f, "[{}]:{}", host, port),
            BindTarget::Ip { host, port } => write!(f, "{}:{}", host, port),
            BindTarget::UnixSocket(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

/// A bound listener ready to be served.
#[derive(Debug)]
pub enum BoundListener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl BoundListener {
    /// Human readable local address.
    pub fn describe(&self) -> String {
        match self {
            BoundListener::Tcp(l) => l
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
            #[cfg(unix)]
            BoundListener::Unix(l) => l
                .local_addr()
                .ok()
                .and_then(|a| a.as_pathname().map(|p| format!("unix:{}", p.display())))
                .unwrap_or_else(|| "unix:unnamed".to_string()),
        }
    }
}

/// Bind the configured target.
pub async fn bind(config: &ListenerConfig) -> Result<BoundListener, ListenerError> {
    let target = BindTarget::from_config(config);
    let listener = match &target {
        BindTarget::Ip { host, port } => {
            let listener = TcpListener::bind((host.as_str(), *port))
                .await
                .map_err(|e| ListenerError::Bind(target.to_string(), e))?;
            BoundListener::Tcp(listener)
        }
        BindTarget::UnixSocket(path) => bind_unix(path, &target)?,
    };

    tracing::info!(target = %target, address = %listener.describe(), "Listener bound");
    Ok(listener)
}

#[cfg(unix)]
fn bind_unix(path: &Path, target: &BindTarget) -> Result<BoundListener, ListenerError> {
    use std::io::{Error, ErrorKind};
    use std::os::unix::fs::FileTypeExt;

    let bind_err = |e: Error| ListenerError::Bind(target.to_string(), e);

    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => {
            tracing::warn!(path = %path.display(), "Removing stale unix socket");
            std::fs::remove_file(path).map_err(bind_err)?;
        }
        Ok(_) => {
            return Err(bind_err(Error::new(
                ErrorKind::AlreadyExists,
                "path exists and is not a socket",
            )));
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(bind_err(e)),
    }
    let listener = UnixListener::bind(path).map_err(bind_err)?;
    Ok(BoundListener::Unix(listener))
}

#[cfg(not(unix))]
fn bind_unix(path: &Path, _target: &BindTarget) -> Result<BoundListener, ListenerError> {
    Err(ListenerError::Unsupported(path.to_path_buf()))
}
