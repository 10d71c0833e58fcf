//! Basic authentication.
//!
//! # Data Flow
//! ```text
//! config.auth.credentials
//!     → credentials.rs (CredentialSet, built once at startup)
//!     → gate.rs (AuthGate::authenticate on every request)
//! ```
//!
//! # Design Decisions
//! - No sessions: every request carries and re-checks its credentials
//! - Exact pair comparison; usernames cannot contain `:`
//! - The `/` exemption lives in the dispatcher, not here

pub mod credentials;
pub mod gate;

pub use credentials::{Credential, CredentialSet};
pub use gate::AuthGate;
