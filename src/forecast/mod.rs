//! Forecast upstream subsystem.
//!
//! # Data Flow
//! ```text
//! weather handler
//!     → client.rs (build URL, bounded GET, classify failures)
//!     → types.rs (columnar `hourly` payload)
//!     → transform.rs (zip columns into rows)
//!     → Vec<WeatherRecord> back to the handler
//! ```
//!
//! # Design Decisions
//! - One attempt per inbound request; no retries, no caching
//! - The deadline covers connect, send and body read
//! - Dropping the inbound request future cancels the outbound call

pub mod client;
pub mod transform;
pub mod types;

pub use client::{UpstreamClient, UpstreamError};
pub use transform::pair_hourly;
pub use types::{ForecastPayload, HourlySeries, WeatherRecord};
