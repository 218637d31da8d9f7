//! Shared fixtures and request helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use form_bootstrap::{AppConfig, RouteConfig};
use tower::ServiceExt;

/// Directory relative fixture paths resolve against.
pub fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests")
}

pub fn app_1_views() -> PathBuf {
    fixtures().join("apps/app_1/views")
}

/// Defaults with no environment influence, rooted at the fixtures.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_lookup(&|_: &str| None);
    config.caller = fixtures();
    config.env = "test".to_string();
    config
}

/// Global views off, one route with app_1's views and the given steps.
pub fn app_1_config(steps: &[&str]) -> AppConfig {
    let mut config = test_config();
    config.views = form_bootstrap::PathSetting::Disabled;
    let mut route = RouteConfig::with_steps(steps.iter().copied());
    route.views = Some(app_1_views());
    config.routes = Some(vec![route]);
    config
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `name=value` of the first `Set-Cookie` for `name`.
    pub fn cookie_pair(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").to_string())
            .find(|pair| pair.starts_with(&format!("{}=", name)))
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

/// GET `uri`, optionally with a `Cookie` header.
pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(router, builder.body(Body::empty()).unwrap()).await
}

/// POST a urlencoded form to `uri` with the given cookies.
pub async fn post_form(router: &Router, uri: &str, cookie: &str, form: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(router, request).await
}
