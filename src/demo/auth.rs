//! API token middleware.

use axum::http::StatusCode;

use crate::controller::middleware::{self, Middleware};
use crate::controller::RequestContext;

/// Header the client sends its token in.
pub const API_TOKEN_HEADER: &str = "X-API-Token";

/// Param key the authenticated [`ApiClient`] is stored under.
pub const CLIENT_PARAM: &str = "api_client";

/// Caller identity attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    pub token: String,
}

/// Rejects requests whose `X-API-Token` does not equal `expected` with a
/// 401 error envelope.
pub fn require_token(expected: impl Into<String>) -> Middleware {
    let expected = expected.into();
    middleware::from_fn(move |ctx: &mut RequestContext| {
        let token = ctx.header(API_TOKEN_HEADER);
        if token.is_empty() {
            ctx.render_json_error(StatusCode::UNAUTHORIZED, "missing API token");
            return false;
        }
        if token != expected {
            tracing::warn!(action = %ctx.current_action(), "Rejected invalid API token");
            ctx.render_json_error(StatusCode::UNAUTHORIZED, "invalid API token");
            return false;
        }

        ctx.set_param(CLIENT_PARAM, ApiClient { token });
        true
    })
}
