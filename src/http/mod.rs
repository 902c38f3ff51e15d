//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper connection builder, limits, graceful drain)
//!     → request ID layer
//!     → middleware/ (security headers → rate limit → request log)
//!     → response timeout
//!     → handlers.rs (/api/health, /api/weather, 404 fallback)
//!     → response.rs (JSON bodies, error → status mapping)
//! ```

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;

pub use middleware::{compose, default_stages, Stage};
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer, ServerError};
