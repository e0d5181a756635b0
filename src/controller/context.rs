//! Per-request context handed to middleware and controller actions.
//!
//! # Responsibilities
//! - Parse the path remainder into id/action tokens
//! - Resolve the REST action once, at construction
//! - Expose query, header, body and parameter accessors
//! - Collect the response rendered by middleware or the action
//!
//! # Design Decisions
//! - The body is buffered before the context is built, so every accessor
//!   and render call is synchronous
//! - Render calls overwrite each other; the last one wins
//! - Nothing rendered means `200 OK` with an empty body

use std::collections::HashSet;

use axum::body::Bytes;
use axum::extract::Query;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::controller::action::Action;
use crate::controller::params::Params;
use crate::http::response;
use crate::model::ModelErrors;
use crate::routing::path::split_remainder;

/// Errors surfaced to controller code while reading the request.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-request state shared by middleware and the controller action.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    root_key: String,
    prefix: String,
    id_token: String,
    action_token: String,
    action: Action,
    params: Params,
    response: Option<Response>,
}

impl RequestContext {
    /// Build the context for a request matched under `prefix`.
    pub fn new(
        parts: Parts,
        body: Bytes,
        root_key: &str,
        prefix: &str,
        extra_actions: &HashSet<String>,
    ) -> Self {
        let path = parts.uri.path();
        let remainder = path.strip_prefix(prefix).unwrap_or(path);
        let tokens = split_remainder(remainder);
        let action = Action::resolve(&parts.method, &tokens.id, &tokens.action, extra_actions);

        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            root_key: root_key.to_string(),
            prefix: prefix.to_string(),
            id_token: tokens.id,
            action_token: tokens.action,
            action,
            params: Params::new(),
            response: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// JSON envelope key configured for this controller.
    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// Prefix of the route that matched.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Record id from the path, or `0` when the token is missing or not a
    /// number.
    pub fn id(&self) -> i64 {
        self.id_token.parse().unwrap_or(0)
    }

    /// Raw first path token after the prefix.
    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    /// Raw second path token after the prefix.
    pub fn action_token(&self) -> &str {
        &self.action_token
    }

    /// Name of the resolved action, e.g. `Show` or `GETEdit`.
    pub fn current_action(&self) -> &str {
        self.action.name()
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// First value of query parameter `name`, or `""`.
    pub fn query_param(&self, name: &str) -> String {
        Query::<Vec<(String, String)>>::try_from_uri(&self.uri)
            .ok()
            .and_then(|Query(pairs)| pairs.into_iter().find(|(key, _)| key == name))
            .map(|(_, value)| value)
            .unwrap_or_default()
    }

    /// First value of header `name`, or `""`.
    pub fn header(&self, name: &str) -> String {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the JSON body.
    ///
    /// With a non-empty `root`, the body must be an object and the value
    /// under `root` is decoded (`null` when the key is absent). With an
    /// empty `root` the whole body is decoded.
    pub fn load_json<T: DeserializeOwned>(&self, root: &str) -> Result<T, ContextError> {
        if root.is_empty() {
            return Ok(serde_json::from_slice(&self.body)?);
        }

        let mut envelope: serde_json::Map<String, Value> = serde_json::from_slice(&self.body)?;
        let payload = envelope.remove(root).unwrap_or(Value::Null);
        Ok(serde_json::from_value(payload)?)
    }

    /// [`RequestContext::load_json`] with the controller's root key.
    pub fn load_json_root<T: DeserializeOwned>(&self) -> Result<T, ContextError> {
        self.load_json(&self.root_key)
    }

    pub fn set_param<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: std::any::Any + Send + Sync,
    {
        self.params.insert(key, value);
    }

    pub fn param<T: std::any::Any>(&self, key: &str) -> Option<&T> {
        self.params.get(key)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Respond with `document` serialized as JSON.
    pub fn render_json<T: Serialize + ?Sized>(&mut self, status: StatusCode, document: &T) {
        self.response = Some(response::json(status, document));
    }

    /// Respond with `{"errors": {"message": [message]}}`.
    pub fn render_json_error(&mut self, status: StatusCode, message: &str) {
        self.response = Some(response::json_error(status, message));
    }

    /// Respond with `{"errors": {<field>: [messages...]}}`.
    pub fn render_model_errors(&mut self, status: StatusCode, errors: &ModelErrors) {
        self.response = Some(response::json(status, &response::errors_envelope(errors)));
    }

    /// Respond with a raw string body.
    pub fn render_string(&mut self, status: StatusCode, body: impl Into<String>) {
        self.response = Some((status, body.into()).into_response());
    }

    /// Respond with a plain-text error.
    pub fn render_error(&mut self, status: StatusCode, message: &str) {
        self.response = Some(response::plain_error(status, message));
    }

    pub fn is_rendered(&self) -> bool {
        self.response.is_some()
    }

    /// The rendered response, or an empty `200 OK`.
    pub fn into_response(self) -> Response {
        self.response
            .unwrap_or_else(|| StatusCode::OK.into_response())
    }
}
