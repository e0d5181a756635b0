//! Type-erased request handlers.
//!
//! Route tables hold handlers of many concrete types (plain async
//! functions, controller dispatchers, tower services such as the static file
//! server), so each one is boxed behind a shared `Fn` returning a boxed
//! future.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{Request, Response as HttpResponse};
use axum::response::{IntoResponse, Response};
use axum::BoxError;
use futures_util::future::BoxFuture;
use tower::{Service, ServiceExt};

type HandlerFn = dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync;

/// A shareable request handler stored in a route table.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Wrap an async function that turns a request into a response.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let inner = move |req: Request<Body>| -> BoxFuture<'static, Response> {
            let fut = f(req);
            Box::pin(async move { fut.await.into_response() })
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Wrap an infallible tower service.
    pub fn from_service<S, B>(service: S) -> Self
    where
        S: Service<Request<Body>, Response = HttpResponse<B>, Error = Infallible>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self::from_fn(move |req| {
            let service = service.clone();
            async move {
                match service.oneshot(req).await {
                    Ok(response) => response.into_response(),
                    Err(never) => match never {},
                }
            }
        })
    }

    /// Run the handler for one request.
    pub fn call(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        (self.inner)(req)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}
