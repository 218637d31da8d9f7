//! Step request handlers.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Extension, Form, OriginalUri},
    response::{IntoResponse, Redirect, Response},
};

use crate::http::response;
use crate::observability::metrics;
use crate::session::Session;
use crate::views::ViewResolver;
use crate::wizard::StepContext;

/// Submitted values for a route, as stored in the session.
pub type StoredValues = BTreeMap<String, String>;

/// Field name to failed validator name.
pub type StoredErrors = BTreeMap<String, String>;

/// Render `view`, mapping failures to a 500.
pub async fn render(views: &ViewResolver, view: &str) -> Response {
    match views.render(view).await {
        Ok(body) => response::html(body),
        Err(e) => {
            tracing::error!(view, error = %e, "Failed to render view");
            response::server_error()
        }
    }
}

/// GET: render the step's view.
pub async fn show(Extension(step): Extension<Arc<StepContext>>) -> Response {
    tracing::debug!(path = %step.path, template = %step.template, "Rendering step");
    render(&step.views, &step.template).await
}

/// POST: validate, store and move on.
///
/// A failed submission redirects back to the URL it was posted to, route
/// params included. Its errors are kept in the session under
/// [`StepContext::errors_key`]; views are static, so nothing renders them.
pub async fn submit(
    Extension(step): Extension<Arc<StepContext>>,
    Extension(session): Extension<Session>,
    OriginalUri(uri): OriginalUri,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let errors_key = step.errors_key();
    let errors: StoredErrors = step.definitions.validate(&step.fields, &form);

    if !errors.is_empty() {
        tracing::info!(path = %step.path, errors = errors.len(), "Step failed validation");
        metrics::record_submission(&step.path, false);
        if let Err(e) = session.insert(&errors_key, &errors) {
            tracing::error!(path = %step.path, error = %e, "Failed to store validation errors");
            return response::server_error();
        }
        return Redirect::to(uri.path()).into_response();
    }

    let mut values: StoredValues = session.get(&step.namespace).unwrap_or_default();
    for name in &step.fields {
        if let Some(value) = form.get(name) {
            values.insert(name.clone(), value.trim().to_string());
        }
    }

    if let Err(e) = session.insert(&step.namespace, &values) {
        tracing::error!(path = %step.path, error = %e, "Failed to store step values");
        return response::server_error();
    }
    session.remove(&errors_key);
    metrics::record_submission(&step.path, true);

    let target = step.next.as_deref().unwrap_or(&step.path);
    tracing::debug!(path = %step.path, next = %target, "Step complete");
    Redirect::to(target).into_response()
}
