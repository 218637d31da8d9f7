//! Bootstrap for multi-step form applications.
//!
//! Validates routes, steps and view/field locations, merges them over
//! environment-driven defaults and returns an axum application serving each
//! step with sessions and cookie checks in place.

pub mod bootstrap;
pub mod config;
pub mod fields;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod session;
pub mod views;
pub mod wizard;

pub use bootstrap::{bootstrap, BootstrapError};
pub use config::{AppConfig, PathSetting, RouteConfig, StepConfig};
pub use http::App;
pub use lifecycle::Shutdown;
