//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when configured
//! - Bootstrap the application (validation, routes, sessions)
//! - Listen when `start` is set
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal
//! - A metrics exporter failure is logged, not fatal
//! - Listener binds last (traffic only when ready)

use thiserror::Error;

use crate::bootstrap::{bootstrap, BootstrapError};
use crate::config::AppConfig;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bootstrap `config` and, if `config.start` is set, serve until shutdown.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    if let Some(address) = config.metrics_address.as_deref() {
        match address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(metrics_address = %address, error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => {
                tracing::error!(metrics_address = %address, "Failed to parse metrics address");
            }
        }
    }

    let app = bootstrap(config)?;

    if !app.config().start {
        tracing::info!("Configuration valid, not starting (start = false)");
        return Ok(());
    }

    app.listen().await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
