//! Router construction from validated routes.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::Extension, middleware, routing::get, Router};
use tower_http::services::ServeDir;

use crate::config::{AppConfig, ResolvedRoute};
use crate::fields::{FieldSet, FieldsError};
use crate::http::{cookie_check::require_cookies, response};
use crate::session::{session_middleware, SessionManager};
use crate::views::ViewResolver;
use crate::wizard::{
    handlers,
    pages::{self, PageContext, COOKIES_PAGE, TERMS_PAGE},
    StepContext,
};

/// URL prefix static assets are served under.
pub const ASSETS_PREFIX: &str = "/public";

/// Build the application router.
///
/// Field definitions are loaded here; a malformed definitions file fails
/// the build.
pub fn build(
    config: &AppConfig,
    routes: &[ResolvedRoute],
    sessions: SessionManager,
) -> Result<Router, FieldsError> {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut wizard = Router::new();

    for route in routes {
        let definitions = Arc::new(FieldSet::load_all(&route.fields)?);
        let views = Arc::new(ViewResolver::new(route.views.clone(), config.view_engine.as_str()));
        let namespace = format!("hof-wizard-{}", route.index);

        for (step_path, step) in &route.steps {
            let context = Arc::new(StepContext::new(
                namespace.as_str(),
                &route.base_url,
                step_path,
                step,
                definitions.clone(),
                views.clone(),
            ));

            let mut step_router = Router::new();
            for mount in route.mounts.get(step_path).into_iter().flatten() {
                step_router = step_router.route(mount, get(handlers::show).post(handlers::submit));
                claimed.insert(mount.clone());
            }
            tracing::debug!(
                route = route.index,
                step = %step_path,
                template = %context.template,
                mounts = ?route.mounts.get(step_path),
                "Mounted step"
            );
            wizard = wizard.merge(step_router.layer(Extension(context)));
        }
    }

    let wizard = wizard
        .layer(middleware::from_fn_with_state(sessions, session_middleware))
        .layer(middleware::from_fn(require_cookies));

    let mut app = Router::new().merge(wizard);

    if let Some(global_views) = config.views.as_path().map(|p| config.resolve(p)) {
        let views = Arc::new(ViewResolver::new(vec![global_views], config.view_engine.as_str()));
        for (enabled, (path, view)) in [(config.get_cookies, COOKIES_PAGE), (config.get_terms, TERMS_PAGE)] {
            if !enabled || claimed.contains(path) {
                continue;
            }
            if views.resolve(view).is_none() {
                tracing::debug!(page = path, view, "View missing, page not served");
                continue;
            }
            let context = Arc::new(PageContext {
                view,
                views: views.clone(),
            });
            app = app.merge(
                Router::new()
                    .route(path, get(pages::show))
                    .layer(Extension(context)),
            );
            claimed.insert(path.to_string());
        }
    }

    let assets: PathBuf = config.resolve(&config.asset_path);
    let assets_taken = claimed
        .iter()
        .any(|p| p == ASSETS_PREFIX || p.starts_with("/public/"));
    if assets.is_dir() && !assets_taken {
        tracing::debug!(path = %assets.display(), prefix = ASSETS_PREFIX, "Serving static assets");
        app = app.nest_service(ASSETS_PREFIX, ServeDir::new(assets));
    }

    Ok(app.fallback(response::fallback))
}
