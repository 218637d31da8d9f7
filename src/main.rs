//! form-bootstrap
//!
//! Loads options (environment defaults, optionally overridden by a TOML
//! file), bootstraps the form application and serves it.
//!
//! ```text
//!   env vars ─┐
//!             ├─► AppConfig ─► bootstrap() ─► App ─► listen (host:port)
//!   options ──┘                  │
//!   (TOML)                       ├─ validate routes / steps / paths
//!                                ├─ load field definitions
//!                                └─ mount steps, pages, assets
//! ```

use std::path::PathBuf;

use clap::Parser;

use form_bootstrap::config::{load_config, AppConfig};
use form_bootstrap::lifecycle::startup;
use form_bootstrap::observability::logging;

#[derive(Parser)]
#[command(name = "form-bootstrap")]
#[command(about = "Serve a multi-step form application", long_about = None)]
struct Cli {
    /// Options file (TOML). Environment defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory relative views/fields paths resolve against.
    #[arg(long)]
    caller: Option<PathBuf>,

    /// Validate the configuration and exit without listening.
    #[arg(long)]
    no_start: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(caller) = cli.caller {
        config.caller = caller;
    }
    if cli.no_start {
        config.start = false;
    }

    logging::init(&config.env)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        caller = %config.caller.display(),
        bind_address = %config.bind_address(),
        "form-bootstrap starting"
    );

    startup::run(config).await?;
    Ok(())
}
