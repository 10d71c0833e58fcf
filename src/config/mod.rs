//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → args.rs (positional bind overrides)
//!     → ServerConfig (validated, immutable)
//!     → consumed once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod args;
pub mod loader;
pub mod schema;
pub mod validation;

pub use args::{apply_bind_args, Cli};
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AuthConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServerConfig, StorageConfig};
pub use validation::{validate_config, ValidationError};
