//! Controller subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration:
//!     RouteBuilder::route(path, factory, root_key, middleware)
//!     → Controller::actions fills an ActionTable (once)
//!     → dispatcher.rs wraps everything in a Handler
//!
//! Per request:
//!     Handler → dispatcher.rs
//!     → context.rs (tokens, action, params, rendering)
//!     → middleware.rs chain
//!     → action.rs table lookup → controller method
//! ```
//!
//! # Design Decisions
//! - Controllers are plain structs built by a factory per request
//! - Actions are looked up by name in an explicit table, never by
//!   reflection
//! - Everything a controller or middleware can do to the request or the
//!   response goes through [`RequestContext`]

pub mod action;
pub mod context;
pub mod dispatcher;
pub mod middleware;
pub mod params;

pub use action::{Action, ActionFn, ActionTable};
pub use context::{ContextError, RequestContext};
pub use middleware::Middleware;
pub use params::Params;

/// A REST controller.
///
/// ```ignore
/// #[derive(Default)]
/// struct PagesController;
///
/// impl Controller for PagesController {
///     fn actions(actions: &mut ActionTable<Self>) {
///         actions
///             .index(Self::index)
///             .show(Self::show)
///             .custom(Method::GET, "edit", Self::edit);
///     }
/// }
/// ```
pub trait Controller: Sized + Send + 'static {
    /// Register the actions this controller answers to.
    fn actions(actions: &mut ActionTable<Self>);

    /// Per-request setup, after the context is built and before middleware.
    fn init(&mut self, _ctx: &RequestContext) {}
}
