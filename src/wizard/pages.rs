//! Standalone pages rendered from the global views (cookies, terms).

use std::sync::Arc;

use axum::{extract::Extension, response::Response};

use crate::views::ViewResolver;
use crate::wizard::handlers::render;

/// Mount path and view name.
pub const COOKIES_PAGE: (&str, &str) = ("/cookies", "cookies");
pub const TERMS_PAGE: (&str, &str) = ("/terms-and-conditions", "terms");

#[derive(Debug)]
pub struct PageContext {
    pub view: &'static str,
    pub views: Arc<ViewResolver>,
}

pub async fn show(Extension(page): Extension<Arc<PageContext>>) -> Response {
    render(&page.views, page.view).await
}
