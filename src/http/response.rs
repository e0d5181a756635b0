//! Response rendering helpers.
//!
//! # Responsibilities
//! - Serialize JSON documents with the JSON content type
//! - Build the `{"errors": ...}` envelope for API errors
//! - Produce the plain-text not-found and error responses
//!
//! # Design Decisions
//! - Encoding failures are logged and turned into a 500 envelope
//! - Compression is applied by the server's compression layer, not here

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{json, Value};

use crate::model::ModelErrors;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// `document` as a JSON response with `status`.
pub fn json<T: Serialize + ?Sized>(status: StatusCode, document: &T) -> Response {
    match serde_json::to_vec(document) {
        Ok(body) => json_bytes(status, body),
        Err(err) => {
            tracing::error!(error = %err, "JSON encoding error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "response encoding failed")
        }
    }
}

/// `{"errors": {"message": [message]}}` with `status`.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    json_bytes(status, error_envelope(message).to_string().into_bytes())
}

/// The error envelope for a single message.
pub fn error_envelope(message: &str) -> Value {
    json!({ "errors": { "message": [message] } })
}

/// The error envelope for per-field model errors.
pub fn errors_envelope(errors: &ModelErrors) -> Value {
    json!({ "errors": errors })
}

/// Plain-text error: the message followed by a newline.
pub fn plain_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE)),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        format!("{message}\n"),
    )
        .into_response()
}

/// The router's response for unmatched paths.
pub fn not_found() -> Response {
    plain_error(StatusCode::NOT_FOUND, "404 page not found")
}

fn json_bytes(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
        Body::from(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_json() {
        let res = json(StatusCode::CREATED, &json!({"page": {"id": 1}}));
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(body_string(res).await, r#"{"page":{"id":1}}"#);
    }

    #[tokio::test]
    async fn test_json_error() {
        let res = json_error(StatusCode::BAD_REQUEST, "action not found");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(res).await,
            r#"{"errors":{"message":["action not found"]}}"#
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let res = not_found();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers()[header::CONTENT_TYPE], TEXT_CONTENT_TYPE);
        assert_eq!(body_string(res).await, "404 page not found\n");
    }
}
