//! Demo application wired from configuration.
//!
//! Mounts a pages resource under the configured API prefix, a `/health`
//! endpoint, and the optional static file route.

pub mod auth;
pub mod pages;

use axum::body::Body;
use axum::http::Request;
use axum::Json;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::controller::Middleware;
use crate::routing::Router;

pub use pages::{Page, PageStore, PagesController};

/// Build the demo router over `store`.
pub fn build_router(config: &AppConfig, store: PageStore) -> Router {
    let mut builder = Router::builder().with_body_limit(config.limits.max_body_bytes);
    builder.handle_func("/health", health);

    let middleware: Vec<Middleware> = config
        .api
        .token
        .iter()
        .map(|token| auth::require_token(token.clone()))
        .collect();

    builder.path_prefix(&config.api.prefix).route(
        "/pages",
        move || PagesController::new(store.clone()),
        "page",
        middleware,
    );

    if let Some(files) = &config.static_files {
        builder.serve_files(
            &files.prefix,
            &files.root,
            files.list_directories,
            files.prefer_gzip,
        );
    }

    builder.build()
}

async fn health(_req: Request<Body>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
