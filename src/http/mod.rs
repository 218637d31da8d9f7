//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (App: Axum router, serve loop)
//!     → request.rs (request id, trace span)
//!     → cookie_check.rs (wizard pages only)
//!     → [session layer, wizard handlers]
//!     → response.rs (html, redirects, error pages)
//! ```

pub mod cookie_check;
pub mod cookies;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::App;
