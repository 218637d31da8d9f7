//! Request IDs and request tracing.
//!
//! # Responsibilities
//! - Generate a UUID `x-request-id` for requests that lack one
//! - Echo the id on the response
//! - Open a tracing span per request carrying the id
//!
//! # Design Decisions
//! - Request ID added as early as possible (outermost layer) for tracing
//! - A client-supplied id is kept rather than replaced

use axum::{
    extract::Request,
    http::{HeaderName, HeaderMap},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Read the request id, or `"unknown"` before the id layer has run.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Extension trait for pulling the id off a request.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn request_id(&self) -> &str {
        request_id(self.headers())
    }
}

/// Wrap `router` with id generation, propagation and a trace span.
pub fn with_request_ids(router: Router) -> Router {
    let header = HeaderName::from_static(X_REQUEST_ID);
    router
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request.request_id(),
            )
        }))
        .layer(SetRequestIdLayer::new(header, MakeRequestUuid))
}
