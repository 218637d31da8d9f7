//! The bootstrapped application and its serve loop.
//!
//! # Responsibilities
//! - Wrap the step router in the shared middleware stack
//! - Expose "use"-style composition (`use_layer`, `merge`)
//! - Bind and serve with graceful shutdown
//! - Purge expired sessions while serving

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    middleware,
    response::IntoResponse,
    routing::Route,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{Layer, Service};

use crate::config::AppConfig;
use crate::http::request::with_request_ids;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::security::{headers, limits};
use crate::session::SessionManager;

/// How often expired sessions are swept while serving.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// A configured application, ready to listen.
pub struct App {
    router: Router,
    config: Arc<AppConfig>,
    sessions: SessionManager,
}

impl App {
    /// Wrap the step router with the shared middleware stack.
    pub fn new(router: Router, config: AppConfig, sessions: SessionManager) -> Self {
        let router = Self::build_router(&config, router);
        Self {
            router,
            config: Arc::new(config),
            sessions,
        }
    }

    fn build_router(config: &AppConfig, router: Router) -> Router {
        let router = headers::apply(router, &config.security);
        let router = limits::apply(router, &config.security, &config.timeouts);
        let router = router.layer(middleware::from_fn(metrics::track_requests));
        with_request_ids(router)
    }

    /// The merged configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// A clone of the router, e.g. for driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Add a middleware layer around every route, including the fallback.
    pub fn use_layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.router = self.router.layer(layer);
        self
    }

    /// Mount additional routes.
    ///
    /// # Panics
    /// If `other` declares a path a step already answers on.
    pub fn merge(mut self, other: Router) -> Self {
        self.router = self.router.merge(other);
        self
    }

    /// Bind `host:port` and serve until SIGINT/SIGTERM.
    pub async fn listen(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.bind_address()).await?;

        let shutdown = Shutdown::new();
        let receiver = shutdown.subscribe();
        tokio::spawn(async move {
            signals::wait_for_shutdown().await;
            shutdown.trigger();
        });

        self.serve(listener, receiver).await
    }

    /// Serve on an existing listener until `shutdown` fires.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            protocol = %self.config.protocol,
            env = %self.config.env,
            "Listening for connections"
        );

        let store = self.sessions.store().clone();
        let purge = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
            loop {
                interval.tick().await;
                let purged = store.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired sessions");
                }
                metrics::record_sessions(store.len());
            }
        });

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await;

        purge.abort();
        tracing::info!("HTTP server stopped");
        result
    }
}
