//! Controller middleware.
//!
//! A middleware runs after the request context is built and before the
//! action. Returning `false` stops the chain: neither later middleware nor
//! the action run, and whatever the middleware rendered is the response.

use std::fmt;
use std::sync::Arc;

use crate::controller::RequestContext;

/// A shareable middleware function.
#[derive(Clone)]
pub struct Middleware {
    inner: Arc<dyn Fn(&mut RequestContext) -> bool + Send + Sync>,
}

impl Middleware {
    /// Run the middleware. `false` short-circuits the request.
    pub fn call(&self, ctx: &mut RequestContext) -> bool {
        (self.inner)(ctx)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// Wrap a function as [`Middleware`].
pub fn from_fn<F>(f: F) -> Middleware
where
    F: Fn(&mut RequestContext) -> bool + Send + Sync + 'static,
{
    Middleware { inner: Arc::new(f) }
}
