//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP / unix socket connection
//!     → server.rs (axum catch-all, buffer body, assign stream id)
//!     → request.rs (decoded Request)
//!     → dispatch.rs (root exemption → auth gate → route table → handler)
//!     → response.rs (status/records → Response, transport headers)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use error::ApiError;
pub use request::Request;
pub use response::Response;
pub use server::HttpServer;
