//! Route records and the build-phase route builder.
//!
//! # Responsibilities
//! - Pair a canonical path prefix with a handler
//! - Compose nested prefixes (`/api/v1` + `/pages`)
//! - Decide which table (exact or prefix) a registration lands in
//!
//! # Design Decisions
//! - Plain handler functions registered directly on the router root are
//!   exact-match routes; registered under any non-empty prefix they become
//!   prefix routes
//! - Controller and static file routes always go to the prefix table

use std::future::Future;
use std::path::PathBuf;

use axum::body::Body;
use axum::http::Request;
use axum::response::IntoResponse;

use crate::controller::dispatcher::controller_handler;
use crate::controller::{Controller, Middleware};
use crate::http::files::file_handler;
use crate::routing::handler::Handler;
use crate::routing::path::canonicalize;
use crate::routing::router::RouterBuilder;

/// A registered (prefix, handler) binding.
#[derive(Debug, Clone)]
pub struct Route {
    prefix: String,
    handler: Handler,
}

impl Route {
    pub(crate) fn new(prefix: String, handler: Handler) -> Self {
        Self { prefix, handler }
    }

    /// The canonical path prefix this route answers for.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// Registers routes under a common path prefix.
///
/// ```ignore
/// let mut builder = Router::builder();
/// let mut api = builder.path_prefix("/api/v1");
/// api.route("/pages", PagesController::default, "page", [auth]);
/// let router = builder.build();
/// ```
pub struct RouteBuilder<'r> {
    router: &'r mut RouterBuilder,
    prefix: String,
}

impl<'r> RouteBuilder<'r> {
    pub(crate) fn new(router: &'r mut RouterBuilder, prefix: impl Into<String>) -> Self {
        Self {
            router,
            prefix: prefix.into(),
        }
    }

    /// The prefix every route registered through this builder starts with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns a child builder rooted at `canonicalize(self.prefix + prefix)`.
    pub fn new_route(&mut self, prefix: &str) -> RouteBuilder<'_> {
        let prefix = self.child_prefix(prefix);
        RouteBuilder::new(&mut *self.router, prefix)
    }

    /// Alias of [`RouteBuilder::new_route`] for grouping, e.g. API versions.
    pub fn path_prefix(&mut self, prefix: &str) -> RouteBuilder<'_> {
        self.new_route(prefix)
    }

    /// Bind an async function to `path`.
    ///
    /// On the router root this is an exact-match route; anywhere else it
    /// matches every path starting with the composed prefix.
    pub fn handle_func<F, Fut, R>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.handle(path, Handler::from_fn(f))
    }

    /// Bind an already erased handler to `path`, with the same table rule
    /// as [`RouteBuilder::handle_func`].
    pub fn handle(&mut self, path: &str, handler: Handler) -> &mut Self {
        let route = Route::new(self.child_prefix(path), handler);
        if self.prefix.is_empty() {
            self.router.add_named(route);
        } else {
            self.router.add_prefixed(route);
        }
        self
    }

    /// Bind `handler` as a prefix route for `path`.
    pub fn handle_prefix(&mut self, path: &str, handler: Handler) -> &mut Self {
        let route = Route::new(self.child_prefix(path), handler);
        self.router.add_prefixed(route);
        self
    }

    /// Bind a controller to `path`.
    ///
    /// `factory` builds a fresh controller for every request. `root_key` is
    /// the JSON envelope key the controller uses for its payloads. The
    /// middleware chain runs in order before the resolved action.
    pub fn route<C, F, M>(&mut self, path: &str, factory: F, root_key: &str, middleware: M) -> &mut Self
    where
        C: Controller,
        F: Fn() -> C + Send + Sync + 'static,
        M: IntoIterator<Item = Middleware>,
    {
        let prefix = self.child_prefix(path);
        let handler = controller_handler(
            factory,
            root_key,
            &prefix,
            middleware.into_iter().collect(),
            self.router.body_limit(),
        );
        self.router.add_prefixed(Route::new(prefix, handler));
        self
    }

    /// Serve files below `root` for every path under `path`.
    ///
    /// Files are looked up by the full request path. With
    /// `list_directories` off, paths ending in `/` are not found; with
    /// `prefer_gzip` on, a `<file>.gz` sibling is served to clients that
    /// accept gzip.
    pub fn serve_files(
        &mut self,
        path: &str,
        root: impl Into<PathBuf>,
        list_directories: bool,
        prefer_gzip: bool,
    ) -> &mut Self {
        let handler = file_handler(root.into(), list_directories, prefer_gzip);
        self.handle_prefix(path, handler)
    }

    fn child_prefix(&self, path: &str) -> String {
        canonicalize(&format!("{}{}", self.prefix, path))
    }
}
