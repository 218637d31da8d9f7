//! Response helpers shared by the handlers.

use axum::{
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

/// A `text/html` response with status 200.
pub fn html(body: String) -> Response {
    Html(body).into_response()
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html("<h1>Not found</h1>\n")).into_response()
}

pub fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Something went wrong</h1>\n"),
    )
        .into_response()
}

pub fn cookies_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html("<h1>Cookies are required to use this service</h1>\n"),
    )
        .into_response()
}

/// 302 to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Router fallback for paths no step or page answers.
pub async fn fallback(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    not_found()
}
