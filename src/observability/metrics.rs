//! Metrics collection and exposition.
//!
//! # Metrics
//! - `form_requests_total` (counter): requests by method, route, status
//! - `form_request_duration_seconds` (histogram): latency by route
//! - `form_step_submissions_total` (counter): POSTs by step and outcome
//! - `form_sessions` (gauge): sessions held by the store
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Route label is the matched pattern, not the raw path

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    metrics::counter!(
        "form_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("form_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_submission(step: &str, valid: bool) {
    let outcome = if valid { "valid" } else { "invalid" };
    metrics::counter!(
        "form_step_submissions_total",
        "step" => step.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_sessions(count: usize) {
    metrics::gauge!("form_sessions").set(count as f64);
}

/// Middleware recording every request.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), &route, start);
    response
}
