//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Build phase:
//!     RouterBuilder / RouteBuilder registrations
//!     → route.rs (canonical prefixes, exact vs prefix table)
//!     → router.rs build(): sort prefixes, freeze as immutable Router
//!
//! Serve phase:
//!     Incoming request path
//!     → path.rs canonicalize (301 if it changes)
//!     → router.rs match: exact table, then prefix table
//!     → handler.rs erased handler, or 404
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the hot path (exact map and prefix scan only)
//! - Deterministic: same path always matches the same route

pub mod handler;
pub mod path;
pub mod route;
pub mod router;

pub use handler::Handler;
pub use path::{canonicalize, split_remainder, PathTokens};
pub use route::{Route, RouteBuilder};
pub use router::{RouteMatch, Router, RouterBuilder, DEFAULT_BODY_LIMIT};
