//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (answer preflight, stamp security/CORS headers on the way out)
//!     → rate_limit.rs (count per client address, reject with 429)
//!     → Pass to logging and handlers
//! ```
//!
//! # Design Decisions
//! - Headers are applied outermost so rejections carry them too
//! - Rate limit state is owned by `RateLimiter` and injected as middleware state
//! - Fail closed: a limited request never reaches a handler

pub mod headers;
pub mod rate_limit;

pub use headers::{apply_security_headers, security_headers_middleware, SECURITY_HEADERS};
pub use rate_limit::{rate_limit_middleware, Decision, RateLimiter};
