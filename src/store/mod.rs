//! Record storage subsystem.
//!
//! # Data Flow
//! ```text
//! Handler (resource key, params / draft / partial)
//!     → records.rs (per-key lock, load whole collection)
//!     → filter.rs (equality predicates over the field table)
//!     → mutate local copy
//!     → backend.rs (write collection + id counter back)
//! ```
//!
//! # Design Decisions
//! - Collections are read and written whole; there are no partial writes
//! - One reader/writer lock per resource key, held for a full operation
//! - Records describe their fields through a static table instead of reflection

pub mod backend;
pub mod error;
pub mod filter;
pub mod record;
pub mod records;

pub use backend::{BackendError, FileStore, MemoryStore, PreferenceStore};
pub use error::StoreError;
pub use filter::Params;
pub use record::{Field, FieldError, Record, ID_FIELD};
pub use records::RecordStore;
