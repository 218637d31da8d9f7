//! Request limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size (413 Payload Too Large)
//! - Enforce total request time (408 Request Timeout)

use std::time::Duration;

use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::schema::{SecurityConfig, TimeoutConfig};

#[allow(deprecated)]
pub fn apply(router: Router, security: &SecurityConfig, timeouts: &TimeoutConfig) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(timeouts.request_secs)))
}
