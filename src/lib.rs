//! Basic-auth REST resource server library.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌─────────┐   ┌─────────┐   ┌──────────┐   ┌─────────┐   ┌───────────┐
//!     ──────────────────▶│   net   │──▶│  http   │──▶│   auth   │──▶│ routing │──▶│ resources │
//!                        │listener │   │ server  │   │   gate   │   │  table  │   │ handlers  │
//!                        └─────────┘   └─────────┘   └──────────┘   └─────────┘   └─────┬─────┘
//!                                                                                        │
//!                                                                                        ▼
//!     Client Response    ┌─────────┐                                              ┌───────────┐
//!     ◀──────────────────│response │◀─────────────────────────────────────────────│   store   │
//!                        │finalize │                                              │  records  │
//!                        └─────────┘                                              └───────────┘
//!
//!     Cross-cutting: config, lifecycle, observability
//! ```

// Core subsystems
pub mod auth;
pub mod http;
pub mod net;
pub mod routing;

// Data
pub mod resources;
pub mod store;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use http::{Dispatcher, HttpServer};
pub use lifecycle::Shutdown;
pub use store::RecordStore;
