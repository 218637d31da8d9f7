//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → limits.rs (body size, request timeout)
//!     → [handlers]
//!     → headers.rs (security response headers)
//! ```

pub mod headers;
pub mod limits;
