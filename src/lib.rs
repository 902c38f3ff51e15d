//! Weather Gateway Library
//!
//! A small HTTP service with a health endpoint and a weather endpoint that
//! proxies and reshapes an hourly forecast API.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ request ID ──▶ security headers ──▶ rate limit ──▶ request log
//!                                                                     │
//!                                                                     ▼
//!   Client ◀── JSON / error text ◀──────────────────────── handlers (health, weather)
//!                                                                     │
//!                                                                     ▼
//!                                                 forecast client ──▶ Forecast API
//! ```

pub mod config;
pub mod forecast;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
