//! Application bootstrap.
//!
//! Validates the configuration, loads field definitions, mounts every
//! route's steps and returns an [`App`] ready to listen. All configuration
//! errors surface here, before anything binds.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::{validate_config, AppConfig, ValidationError};
use crate::fields::FieldsError;
use crate::http::App;
use crate::routing;
use crate::session::{MemoryStore, SessionManager, SessionStore};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fields(#[from] FieldsError),
}

/// Validate `config` and build the application.
///
/// `config.start` is not consulted: the returned [`App`] never binds on its
/// own, call [`App::listen`] or [`App::serve`]. The binary honours `start`
/// through [`crate::lifecycle::startup::run`].
///
/// ```no_run
/// use form_bootstrap::{bootstrap, AppConfig, RouteConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = AppConfig::default();
/// config.routes = Some(vec![RouteConfig::with_steps(["/one", "/two"])]);
/// bootstrap(config)?.listen().await?;
/// # Ok(())
/// # }
/// ```
pub fn bootstrap(config: AppConfig) -> Result<App, BootstrapError> {
    let routes = validate_config(&config)?;

    let store: Arc<dyn SessionStore> =
        Arc::new(MemoryStore::new(Duration::from_secs(config.session.ttl)));
    let sessions = SessionManager::new(store, &config.session, config.is_secure());
    tracing::debug!(
        cookie_name = %config.session.name,
        ttl_secs = config.session.ttl,
        redis_host = %config.redis.host,
        redis_port = config.redis.port,
        "Using in-process session store"
    );

    let router = routing::build(&config, &routes, sessions.clone())?;

    tracing::info!(
        routes = routes.len(),
        steps = routes.iter().map(|r| r.steps.len()).sum::<usize>(),
        env = %config.env,
        translations = %config.resolve(&config.translations).display(),
        "Application bootstrapped"
    );

    Ok(App::new(router, config, sessions))
}
