//! Multi-step form handling.
//!
//! Each step answers GET by rendering its view and POST by validating the
//! step's fields, saving them to the session and redirecting to the next
//! step. Submitted values live in the session under the route's namespace.

pub mod handlers;
pub mod pages;

use std::sync::Arc;

use crate::config::StepConfig;
use crate::fields::FieldSet;
use crate::routing::params::join_path;
use crate::views::ViewResolver;

/// Everything a step handler needs, shared across its mount paths.
#[derive(Debug)]
pub struct StepContext {
    /// Session key holding this route's submitted values.
    pub namespace: String,

    /// URL of the step without route params.
    pub path: String,

    /// View rendered on GET.
    pub template: String,

    /// Fields collected on POST.
    pub fields: Vec<String>,

    /// Redirect target after a valid POST.
    pub next: Option<String>,

    pub definitions: Arc<FieldSet>,

    pub views: Arc<ViewResolver>,
}

impl StepContext {
    pub fn new(
        namespace: impl Into<String>,
        base_url: &str,
        step_path: &str,
        step: &StepConfig,
        definitions: Arc<FieldSet>,
        views: Arc<ViewResolver>,
    ) -> Self {
        let template = step
            .template
            .clone()
            .unwrap_or_else(|| default_template(step_path));
        Self {
            namespace: namespace.into(),
            path: join_path(base_url, step_path),
            template,
            fields: step.fields.clone(),
            next: step.next.as_deref().map(|next| resolve_next(base_url, next)),
            definitions,
            views,
        }
    }

    /// Session key holding validation errors for this step.
    pub fn errors_key(&self) -> String {
        format!("{}-errors:{}", self.namespace, self.path)
    }
}

/// `/one` renders `one`; the root step renders `index`.
fn default_template(step_path: &str) -> String {
    match step_path.trim_matches('/') {
        "" => "index".to_string(),
        name => name.to_string(),
    }
}

/// Relative `next` values resolve under the route's base URL; absolute
/// URLs are used as given.
fn resolve_next(base_url: &str, next: &str) -> String {
    if next.contains("://") {
        next.to_string()
    } else if next.starts_with('/') {
        join_path(base_url, next)
    } else {
        join_path(base_url, &format!("/{}", next))
    }
}
