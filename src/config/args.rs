//! Command line arguments.
//!
//! Positional bind arguments are accepted in three shapes:
//! `HOST PORT`, `PORT` or `SOCKET_PATH`. Anything else falls back to
//! the configured listener.

use clap::Parser;
use std::path::PathBuf;

use crate::config::schema::{ListenerConfig, DEFAULT_HOST};

#[derive(Parser, Debug)]
#[command(name = "resource-server")]
#[command(about = "Basic-auth REST resource server", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// `PORT`, `HOST PORT` or `SOCKET_PATH`.
    #[arg(num_args = 0..=2, value_name = "BIND")]
    pub bind: Vec<String>,
}

/// Overlay positional bind arguments onto the listener config.
pub fn apply_bind_args(listener: &mut ListenerConfig, bind: &[String]) {
    let ports: Vec<Option<u16>> = bind.iter().map(|s| s.parse().ok()).collect();

    match (bind, ports.as_slice()) {
        ([host, _], [_, Some(port)]) => {
            listener.host = host.clone();
            listener.port = *port;
            listener.unix_socket = None;
        }
        ([_, rest @ ..], [Some(port), ..]) => {
            warn_ignored(rest);
            listener.host = DEFAULT_HOST.to_string();
            listener.port = *port;
            listener.unix_socket = None;
        }
        ([path, rest @ ..], _) => {
            warn_ignored(rest);
            listener.unix_socket = Some(PathBuf::from(path));
        }
        _ => {}
    }
}

fn warn_ignored(rest: &[String]) {
    if !rest.is_empty() {
        tracing::warn!(ignored = ?rest, "Ignoring extra bind arguments");
    }
}
