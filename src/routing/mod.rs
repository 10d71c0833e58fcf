//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route table scan)
//!     → matcher.rs (method equality AND path prefix)
//!     → Return: Matched route, NoMatch or Ambiguous
//!
//! Route table construction (at startup):
//!     resources::routes(store)
//!     → RouteTable::new
//!     → conflicts() logged as warnings
//!     → frozen, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Routes are fixed at startup, immutable at runtime
//! - Plain string-prefix matching; no segment boundaries, no regex
//! - Exactly one route must match; table order never breaks a tie

pub mod matcher;
pub mod router;

pub use router::{Handler, Resolution, Route, RouteTable};
