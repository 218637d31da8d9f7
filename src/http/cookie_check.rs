//! Cookie support check for wizard pages.
//!
//! A request without cookies is redirected once to the same URL with a
//! probe parameter while a probe cookie is set. If the browser comes back
//! with the probe parameter and still no cookies, cookies are disabled and
//! the request is refused.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::http::{cookies, response};

/// Query parameter marking the probe redirect.
pub const COOKIE_CHECK_PARAM: &str = "hof-cookie-check";

const PROBE_COOKIE: &str = "hof-cookie-check=1; Path=/; HttpOnly";

pub async fn require_cookies(request: Request, next: Next) -> Response {
    if cookies::any(request.headers()) {
        return next.run(request).await;
    }

    let uri = request.uri();
    let query = uri.query().unwrap_or("");
    let probing = query
        .split('&')
        .any(|pair| pair == COOKIE_CHECK_PARAM || pair.starts_with("hof-cookie-check="));

    if probing {
        tracing::info!(path = %uri.path(), "Refusing request from client without cookies");
        return response::cookies_required();
    }

    let location = if query.is_empty() {
        format!("{}?{}", uri.path(), COOKIE_CHECK_PARAM)
    } else {
        format!("{}?{}&{}", uri.path(), query, COOKIE_CHECK_PARAM)
    };

    let mut redirect = response::found(&location);
    redirect
        .headers_mut()
        .append(header::SET_COOKIE, HeaderValue::from_static(PROBE_COOKIE));
    redirect
}
