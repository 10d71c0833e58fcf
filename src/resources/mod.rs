//! REST resources exposed by the server.
//!
//! # Data Flow
//! ```text
//! Route handler (GET/PUT/PATCH/DELETE /<key>)
//!     → handlers.rs (decode body, derive address from path + query)
//!     → store::RecordStore
//!     → http::Response
//! ```

pub mod handlers;
pub mod person;

pub use handlers::Resource;
pub use person::{Person, PersonDraft};

use std::sync::Arc;

use crate::routing::Route;
use crate::store::RecordStore;

/// Resource key under which persons are stored and routed.
pub const PERSONS: &str = "persons";

/// Every route the server answers besides `/`.
pub fn routes(store: Arc<RecordStore>) -> Vec<Route> {
    Resource::<Person>::new(PERSONS, store).routes()
}
