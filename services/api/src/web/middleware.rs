//! services/api/src/web/middleware.rs
//!
//! Request-scoped tracing middleware.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The id of the request being handled, available to handlers as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Middleware that tags each request with an id and runs it inside a span
/// carrying that id.
///
/// An incoming `x-request-id` header is reused; otherwise a v4 UUID is generated.
/// The id is echoed back on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    // 1. Reuse the caller's id, or mint one
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // 2. Open the span and expose the id to handlers
    let span = info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );
    req.extensions_mut().insert(RequestId(id.clone()));

    // 3. Continue to the handler
    let mut response = next.run(req).instrument(span).await;

    // 4. Echo the id back
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
