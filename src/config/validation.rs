//! Configuration validation.
//!
//! # Responsibilities
//! - Require a route list, and a step map on every route
//! - Check referenced fields/views locations exist on disk
//! - Resolve relative paths against the configured caller directory
//! - Reject step paths, base URLs and params the router cannot mount
//! - Detect two steps claiming the same URL
//!
//! # Design Decisions
//! - Fails on the first error: startup aborts, nothing is partially mounted
//! - Checks run in a fixed order (routes, steps, global fields, global views,
//!   then each route's fields and views) so the reported error is stable
//! - Paths are normalised lexically; the target need not exist to be named

use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{AppConfig, RouteConfig, StepConfig};
use crate::fields;
use crate::routing::params::{self, ParamPattern};

/// A configuration error raised before the application is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Must be called with a list of routes")]
    MissingRoutes,

    #[error("Each route must define a set of one or more steps")]
    MissingSteps { route: usize },

    #[error("Cannot find fields at {}", .0.display())]
    FieldsNotFound(PathBuf),

    #[error("Cannot find route fields at {}", .0.display())]
    RouteFieldsNotFound(PathBuf),

    #[error("Cannot find views at {}", .0.display())]
    ViewsNotFound(PathBuf),

    #[error("Cannot find route views at {}", .0.display())]
    RouteViewsNotFound(PathBuf),

    #[error("Invalid step path {path:?}: must start with '/' and contain no pattern characters")]
    InvalidStepPath { path: String },

    #[error("Invalid base URL {base_url:?}: must not contain pattern characters")]
    InvalidBaseUrl { base_url: String },

    #[error("Invalid route params {pattern:?}: {reason}")]
    InvalidParams { pattern: String, reason: String },

    #[error("Path {path} is declared by more than one step")]
    DuplicatePath { path: String },
}

/// A route that passed validation, with every location resolved.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    /// Position in the configured route list.
    pub index: usize,

    /// Normalised base URL; empty when the route is mounted at the root.
    pub base_url: String,

    /// Steps keyed by their configured path.
    pub steps: BTreeMap<String, StepConfig>,

    /// URLs each step answers on, keyed like `steps`.
    pub mounts: BTreeMap<String, Vec<String>>,

    /// Views directories in lookup order (route first, then global).
    pub views: Vec<PathBuf>,

    /// Field definition locations in merge order (global first, then route).
    pub fields: Vec<PathBuf>,
}

/// Validate a configuration and resolve each route's locations.
pub fn validate_config(config: &AppConfig) -> Result<Vec<ResolvedRoute>, ValidationError> {
    let routes = match config.routes.as_deref() {
        Some(routes) if !routes.is_empty() => routes,
        _ => return Err(ValidationError::MissingRoutes),
    };

    for (index, route) in routes.iter().enumerate() {
        if route.steps.is_none() {
            return Err(ValidationError::MissingSteps { route: index });
        }
    }

    let global_fields = match config.fields.as_path() {
        Some(path) => {
            let resolved = config.resolve(path);
            let location =
                fields::locate(&resolved).ok_or(ValidationError::FieldsNotFound(resolved))?;
            Some(location)
        }
        None => None,
    };

    let global_views = match config.views.as_path() {
        Some(path) => {
            let resolved = config.resolve(path);
            if !resolved.is_dir() {
                return Err(ValidationError::ViewsNotFound(resolved));
            }
            Some(resolved)
        }
        None => None,
    };

    let mut claimed = HashSet::new();
    let mut resolved_routes = Vec::with_capacity(routes.len());

    for (index, route) in routes.iter().enumerate() {
        let resolved = resolve_route(config, index, route, &global_fields, &global_views)?;
        for path in resolved.mounts.values().flatten() {
            if !claimed.insert(route_shape(path)) {
                return Err(ValidationError::DuplicatePath { path: path.clone() });
            }
        }
        resolved_routes.push(resolved);
    }

    Ok(resolved_routes)
}

fn resolve_route(
    config: &AppConfig,
    index: usize,
    route: &RouteConfig,
    global_fields: &Option<PathBuf>,
    global_views: &Option<PathBuf>,
) -> Result<ResolvedRoute, ValidationError> {
    let mut fields: Vec<PathBuf> = global_fields.iter().cloned().collect();
    if let Some(path) = non_empty(route.fields.as_deref()) {
        let resolved = config.resolve(path);
        let location =
            fields::locate(&resolved).ok_or(ValidationError::RouteFieldsNotFound(resolved))?;
        fields.push(location);
    }

    let mut views = Vec::new();
    if let Some(path) = non_empty(route.views.as_deref()) {
        let resolved = config.resolve(path);
        if !resolved.is_dir() {
            return Err(ValidationError::RouteViewsNotFound(resolved));
        }
        views.push(resolved);
    }
    views.extend(global_views.iter().cloned());

    let base_url = normalize_base_url(route.base_url.as_deref().unwrap_or(""))?;

    let pattern = match route.params.as_deref() {
        Some(raw) => ParamPattern::parse(raw).map_err(|reason| ValidationError::InvalidParams {
            pattern: raw.to_string(),
            reason,
        })?,
        None => ParamPattern::default(),
    };

    let steps = route.steps.clone().unwrap_or_default();
    let mut mounts = BTreeMap::new();
    for step in steps.keys() {
        if !is_valid_step_path(step) {
            return Err(ValidationError::InvalidStepPath { path: step.clone() });
        }
        mounts.insert(step.clone(), params::mount_paths(&base_url, step, &pattern));
    }

    Ok(ResolvedRoute {
        index,
        base_url,
        steps,
        mounts,
        views,
        fields,
    })
}

/// `path` with every `{name}` capture reduced to `{}`. The router treats
/// captures at the same position as the same route whatever their names.
fn route_shape(path: &str) -> String {
    let mut shape = String::with_capacity(path.len());
    let mut in_capture = false;
    for c in path.chars() {
        match c {
            '{' => {
                in_capture = true;
                shape.push('{');
            }
            '}' => {
                in_capture = false;
                shape.push('}');
            }
            _ if in_capture => {}
            _ => shape.push(c),
        }
    }
    shape
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn has_pattern_chars(path: &str) -> bool {
    path.contains(['{', '}', ':', '*', '?', '#'])
}

fn is_valid_step_path(path: &str) -> bool {
    path.starts_with('/') && !has_pattern_chars(path) && !path.contains("//")
}

/// Leading slash, no trailing slash, empty for the root.
pub fn normalize_base_url(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if has_pattern_chars(trimmed) {
        return Err(ValidationError::InvalidBaseUrl {
            base_url: raw.to_string(),
        });
    }
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{}", trimmed))
    }
}

/// Join `path` onto `base` and make the result absolute, resolving `.` and
/// `..` lexically.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let joined = base.join(path);
    let absolute = std::path::absolute(&joined).unwrap_or(joined);
    normalize(&absolute)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
