//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! config.listener (host/port or unix socket path)
//!     → listener.rs (bind, stale socket cleanup)
//!     → BoundListener
//!     → Hand off to http::HttpServer
//! ```
//!
//! # Design Decisions
//! - A unix socket path takes precedence over host/port
//! - Binding failures are fatal at startup

pub mod listener;

pub use listener::{bind, BindTarget, BoundListener, ListenerError};
