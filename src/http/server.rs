//! HTTP server setup.
//!
//! # Responsibilities
//! - Host the sealed [`Router`] inside an axum application
//! - Wire up middleware (tracing, request ID, timeout, JSON compression)
//! - Serve on a listener until shutdown

use std::time::Duration;

use axum::http::{header, Extensions, HeaderMap, StatusCode, Version};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    compression::CompressionLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::routing::Router;

/// HTTP server wrapping a sealed router.
pub struct HttpServer {
    app: axum::Router,
    config: AppConfig,
}

impl HttpServer {
    pub fn new(config: AppConfig, router: Router) -> Self {
        let app = Self::build_app(&config, router);
        Self { app, config }
    }

    /// Build the axum application with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &AppConfig, router: Router) -> axum::Router {
        axum::Router::new()
            .fallback_service(router)
            .layer(CompressionLayer::new().compress_when(is_json))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// The application as a tower service, e.g. for in-process tests.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Serve on `listener` until `shutdown` fires or Ctrl+C is received.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app.into_make_service())
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Only JSON bodies are compressed; files and plain text pass through.
fn is_json(_status: StatusCode, _version: Version, headers: &HeaderMap, _extensions: &Extensions) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_only_json_is_compressed() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(StatusCode::OK, Version::HTTP_11, &headers, &Extensions::new()));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(StatusCode::OK, Version::HTTP_11, &headers, &Extensions::new()));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(StatusCode::OK, Version::HTTP_11, &headers, &Extensions::new()));
    }
}
