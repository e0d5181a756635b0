//! rapi: a small REST routing framework on top of axum.
//!
//! ```text
//!   request ──▶ HttpServer layers ──▶ Router ──▶ exact table ──▶ handler
//!                (trace, request id,     │
//!                 timeout, gzip)         └────▶ prefix table ──▶ controller dispatch
//!                                                                 │
//!                                    middleware chain ◀──────────┘
//!                                           │
//!                                           ▼
//!                                  Index/Show/Create/Update/Destroy/custom
//! ```
//!
//! Routes are registered on a [`RouterBuilder`] and sealed into a
//! [`Router`]. Controllers declare their actions in an [`ActionTable`]
//! and receive a [`RequestContext`] for every request.

// Core
pub mod controller;
pub mod model;
pub mod routing;

// Hosting
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub mod demo;

pub use config::AppConfig;
pub use controller::{ActionTable, Controller, Middleware, RequestContext};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use model::{ModelErrors, Validator};
pub use routing::{Router, RouterBuilder};
