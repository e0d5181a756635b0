//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum host, tower-http layers)
//!     → request.rs (request ID)
//!     → routing::Router (match + dispatch)
//!     → response.rs (JSON / error rendering)
//!     → Send to client (gzip for JSON when accepted)
//! ```

pub mod files;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
