//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment variables
//!     → env.rs (lookups with defaults)
//!     → schema.rs (AppConfig defaults)
//! options file (TOML, optional)
//!     → loader.rs (parse over the defaults)
//! bootstrap()
//!     → validation.rs (routes, steps, on-disk locations)
//!     → ResolvedRoute[] handed to routing
//! ```
//!
//! # Design Decisions
//! - Config is immutable once bootstrapped
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, PathSetting, RouteConfig, SessionConfig, StepConfig};
pub use validation::{validate_config, ResolvedRoute, ValidationError};
