//! Controller dispatch.
//!
//! # Data Flow
//! ```text
//! Request (matched under prefix)
//!     → buffer body (size limited)
//!     → RequestContext::new (tokens + action resolved once)
//!     → factory() builds a fresh controller, Controller::init
//!     → middleware chain (false = stop)
//!     → ActionTable lookup by action name
//!         found   → action(&mut controller, &mut ctx)
//!         missing → 400 {"errors":{"message":["action not found"]}}
//!     → ctx.into_response()
//! ```
//!
//! # Design Decisions
//! - No controller state survives a request
//! - The action table is built once per route, at registration
//! - Every failure becomes a response; the dispatcher never errors

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;

use crate::controller::{ActionTable, Controller, Middleware, RequestContext};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::handler::Handler;

struct Binding<C, F> {
    factory: F,
    root_key: String,
    prefix: String,
    actions: ActionTable<C>,
    extra_actions: HashSet<String>,
    middleware: Vec<Middleware>,
    body_limit: usize,
}

/// Build the handler that dispatches requests to controller `C`.
pub(crate) fn controller_handler<C, F>(
    factory: F,
    root_key: &str,
    prefix: &str,
    middleware: Vec<Middleware>,
    body_limit: usize,
) -> Handler
where
    C: Controller,
    F: Fn() -> C + Send + Sync + 'static,
{
    let mut actions = ActionTable::new();
    C::actions(&mut actions);
    let extra_actions = actions.extra_actions();

    tracing::debug!(
        prefix = %prefix,
        root_key = %root_key,
        actions = ?actions,
        middleware = middleware.len(),
        "Controller bound"
    );

    let binding = Arc::new(Binding {
        factory,
        root_key: root_key.to_string(),
        prefix: prefix.to_string(),
        actions,
        extra_actions,
        middleware,
        body_limit,
    });

    Handler::from_fn(move |req| {
        let binding = Arc::clone(&binding);
        async move { binding.dispatch(req).await }
    })
}

impl<C, F> Binding<C, F>
where
    C: Controller,
    F: Fn() -> C,
{
    async fn dispatch(&self, req: Request<Body>) -> Response {
        let (parts, body) = req.into_parts();
        let body = match axum::body::to_bytes(body, self.body_limit).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(prefix = %self.prefix, error = %err, "Failed to read request body");
                metrics::record_dispatch("none", StatusCode::BAD_REQUEST.as_u16());
                return response::json_error(StatusCode::BAD_REQUEST, "invalid request body");
            }
        };

        let mut ctx = RequestContext::new(
            parts,
            body,
            &self.root_key,
            &self.prefix,
            &self.extra_actions,
        );
        let mut controller = (self.factory)();
        controller.init(&ctx);

        for (position, middleware) in self.middleware.iter().enumerate() {
            if !middleware.call(&mut ctx) {
                tracing::debug!(
                    prefix = %self.prefix,
                    action = %ctx.current_action(),
                    position,
                    "Middleware stopped the request"
                );
                return finish(ctx);
            }
        }

        match self.actions.get(ctx.current_action()) {
            Some(action) => {
                tracing::debug!(prefix = %self.prefix, action = %ctx.current_action(), "Dispatching action");
                action(&mut controller, &mut ctx);
            }
            None => {
                tracing::warn!(
                    prefix = %self.prefix,
                    method = %ctx.method(),
                    action = %ctx.current_action(),
                    "Action not found"
                );
                ctx.render_json_error(StatusCode::BAD_REQUEST, "action not found");
            }
        }

        finish(ctx)
    }
}

fn finish(ctx: RequestContext) -> Response {
    let action = ctx.current_action().to_string();
    let response = ctx.into_response();
    metrics::record_dispatch(&action, response.status().as_u16());
    response
}
