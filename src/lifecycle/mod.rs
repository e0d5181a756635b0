//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging → Build router → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Shutdown::trigger() or Ctrl+C
//!     → wait_for_shutdown resolves
//!     → axum stops accepting and drains in-flight requests
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_shutdown, Shutdown};
