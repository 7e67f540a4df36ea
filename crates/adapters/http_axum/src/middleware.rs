//! Cross-cutting middleware pieces used by [`crate::router::build`].

use std::any::Any;

use axum::Json;
use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::Span;

use crate::envelope::Envelope;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Access-log span for one request, tagged with its request id.
pub fn make_request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

/// Turn a handler panic into a logged 500 envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else {
        "non-string panic payload"
    };

    tracing::error!(outcome = "panicked", panic = detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::failure("internal server error")),
    )
        .into_response()
}

/// Replace axum's bare 405 with an envelope, keeping the `Allow` header.
pub async fn method_not_allowed_envelope(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    tracing::debug!(%method, outcome = "rejected", "method not allowed");

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut replacement = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(Envelope::failure("method not allowed")),
    )
        .into_response();
    if let Some(allow) = allow {
        replacement.headers_mut().insert(header::ALLOW, allow);
    }
    replacement
}
