//! Route tables, lookup and the serving entry point.
//!
//! # Responsibilities
//! - Collect routes during the build phase ([`RouterBuilder`])
//! - Freeze them into an immutable lookup structure ([`Router`])
//! - Resolve a path in two phases: exact table, then prefix table
//! - Redirect non-canonical paths before matching
//!
//! # Design Decisions
//! - Build and serve are separate types, so routes cannot be added once
//!   traffic is accepted
//! - Prefixes are scanned in descending lexicographic order. This puts
//!   `/aaa` before `/aa` before `/a`, but it is not a true longest-prefix
//!   match for unrelated prefixes of different lengths
//! - Explicit `None` on a miss; the caller renders the 404

use std::collections::HashMap;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use tower::Service;

use crate::http::response;
use crate::observability::metrics;
use crate::routing::handler::Handler;
use crate::routing::path::canonicalize;
use crate::routing::route::{Route, RouteBuilder};

/// Default limit for buffered controller request bodies (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Request extension describing which route served the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Prefix of the matched route.
    pub prefix: String,
    /// Part of the request path after the prefix.
    pub remainder: String,
}

/// Build-phase router. Call [`RouterBuilder::build`] to start serving.
#[derive(Debug)]
pub struct RouterBuilder {
    named: HashMap<String, Route>,
    prefixed: HashMap<String, Route>,
    body_limit: usize,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            named: HashMap::new(),
            prefixed: HashMap::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Maximum request body size buffered for controller routes registered
    /// after this call.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Returns a route builder for `prefix`. The empty prefix is the router
    /// root.
    pub fn new_route(&mut self, prefix: &str) -> RouteBuilder<'_> {
        RouteBuilder::new(self, prefix)
    }

    /// Returns a route builder rooted at `prefix`, for grouping routes.
    pub fn path_prefix(&mut self, prefix: &str) -> RouteBuilder<'_> {
        self.new_route(prefix)
    }

    /// Bind a controller under `path`. See [`RouteBuilder::route`].
    pub fn route<C, F, M>(&mut self, path: &str, factory: F, root_key: &str, middleware: M) -> &mut Self
    where
        C: crate::controller::Controller,
        F: Fn() -> C + Send + Sync + 'static,
        M: IntoIterator<Item = crate::controller::Middleware>,
    {
        self.new_route("").route(path, factory, root_key, middleware);
        self
    }

    /// Bind an async function to the exact path `path`.
    pub fn handle_func<F, Fut, R>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.new_route("").handle_func(path, f);
        self
    }

    /// Bind `handler` to every path starting with `path`.
    pub fn handle_prefix(&mut self, path: &str, handler: Handler) -> &mut Self {
        self.new_route("").handle_prefix(path, handler);
        self
    }

    /// Serve files below `root` under `path`. See [`RouteBuilder::serve_files`].
    pub fn serve_files(
        &mut self,
        path: &str,
        root: impl Into<PathBuf>,
        list_directories: bool,
        prefer_gzip: bool,
    ) -> &mut Self {
        self.new_route("").serve_files(path, root, list_directories, prefer_gzip);
        self
    }

    pub(crate) fn add_named(&mut self, route: Route) {
        tracing::debug!(path = %route.prefix(), "Registering exact route");
        if let Some(previous) = self.named.insert(route.prefix().to_string(), route) {
            tracing::warn!(path = %previous.prefix(), "Exact route replaced");
        }
    }

    pub(crate) fn add_prefixed(&mut self, route: Route) {
        tracing::debug!(prefix = %route.prefix(), "Registering prefix route");
        if let Some(previous) = self.prefixed.insert(route.prefix().to_string(), route) {
            tracing::warn!(prefix = %previous.prefix(), "Prefix route replaced");
        }
    }

    /// Seal the route tables.
    pub fn build(self) -> Router {
        let mut prefixed: Vec<Route> = self.prefixed.into_values().collect();
        prefixed.sort_by(|a, b| b.prefix().cmp(a.prefix()));

        tracing::info!(
            exact_routes = self.named.len(),
            prefix_routes = prefixed.len(),
            "Router built"
        );

        Router {
            table: Arc::new(RouteTable {
                named: self.named,
                prefixed,
            }),
        }
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct RouteTable {
    named: HashMap<String, Route>,
    /// Sorted by prefix, descending.
    prefixed: Vec<Route>,
}

/// Immutable router, shared by every in-flight request.
#[derive(Debug, Clone)]
pub struct Router {
    table: Arc<RouteTable>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Resolve `path` to a route: exact table first, then the first prefix
    /// (in descending order) that `path` starts with.
    pub fn match_path(&self, path: &str) -> Option<&Route> {
        if let Some(route) = self.table.named.get(path) {
            return Some(route);
        }
        self.table
            .prefixed
            .iter()
            .find(|route| path.starts_with(route.prefix()))
    }

    /// Number of exact-match routes.
    pub fn exact_routes(&self) -> usize {
        self.table.named.len()
    }

    /// Number of prefix routes.
    pub fn prefix_routes(&self) -> usize {
        self.table.prefixed.len()
    }

    /// Serve one request.
    ///
    /// Non-canonical paths are answered with `301 Moved Permanently` to the
    /// canonical path. Otherwise the matched handler runs with a
    /// [`RouteMatch`] extension attached; unmatched paths get a 404.
    pub async fn serve(&self, mut req: Request<Body>) -> Response {
        let path = req.uri().path().to_string();

        let canonical = canonicalize(&path);
        if canonical != path {
            let location = match req.uri().query() {
                Some(query) => format!("{canonical}?{query}"),
                None => canonical,
            };
            tracing::debug!(path = %path, location = %location, "Redirecting to canonical path");
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
        }

        let Some(route) = self.match_path(&path) else {
            tracing::debug!(method = %req.method(), path = %path, "No route matched");
            metrics::record_route_miss();
            return response::not_found();
        };

        tracing::debug!(
            method = %req.method(),
            path = %path,
            prefix = %route.prefix(),
            "Route matched"
        );

        let remainder = path[route.prefix().len()..].to_string();
        req.extensions_mut().insert(RouteMatch {
            prefix: route.prefix().to_string(),
            remainder,
        });

        route.handler().call(req).await
    }
}

impl Service<Request<Body>> for Router {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let router = self.clone();
        Box::pin(async move { Ok(router.serve(req).await) })
    }
}
