//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! ResolvedRoute[] (validated config)
//!     → params.rs (expand `/:name?` into concrete mount paths)
//!     → builder.rs (one handler pair per step, shared StepContext)
//!     → cookie check + session layers over all steps
//!     → pages, assets, 404 fallback
//!     → frozen axum Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Overlapping step URLs are rejected during validation, never at mount
//! - Optional params mount every shape explicitly rather than via wildcards

pub mod builder;
pub mod params;

pub use builder::build;
