//! Fixed-window rate limiting per client address.
//!
//! All counters share one window: once it has elapsed, the next request
//! clears every counter at once. This is not a sliding window.
//!
//! Keys are the peer IP of the TCP connection, without the port, so a client
//! cannot reset its count by opening a new connection. Keying on the full
//! `ip:port` remote address would count each connection separately. Behind a
//! reverse proxy every client shares the proxy's address and therefore one
//! counter.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;

use crate::config::RateLimitConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { count: u32 },
    Limited { count: u32 },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

struct Window {
    counts: HashMap<String, u32>,
    last_reset: Instant,
}

/// Shared per-address request counters with a wholesale reset policy.
pub struct RateLimiter {
    window: Mutex<Window>,
    max_requests: u32,
    period: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, period: Duration) -> Self {
        Self {
            window: Mutex::new(Window {
                counts: HashMap::new(),
                last_reset: Instant::now(),
            }),
            max_requests,
            period,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }

    /// Count a request from `key` and decide whether it may proceed.
    ///
    /// The count is incremented even when the request is limited.
    pub fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");

        if now.duration_since(window.last_reset) > self.period {
            window.counts.clear();
            window.last_reset = now;
        }

        let count = window.counts.entry(key.to_string()).or_insert(0);
        *count = count.saturating_add(1);

        if *count > self.max_requests {
            Decision::Limited { count: *count }
        } else {
            Decision::Allowed { count: *count }
        }
    }

    /// Current count for `key` in the active window.
    pub fn count(&self, key: &str) -> u32 {
        let window = self.window.lock().expect("rate limiter mutex poisoned");
        window.counts.get(key).copied().unwrap_or(0)
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }
}

/// Middleware stage: reject with 429 once an address exceeds its budget.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = addr.ip().to_string();

    match limiter.check(&key) {
        Decision::Allowed { .. } => next.run(request).await,
        Decision::Limited { count } => {
            tracing::warn!(
                client = %key,
                count,
                limit = limiter.max_requests(),
                "Rate limit exceeded"
            );
            metrics::record_rate_limited();
            ApiError::RateLimited.into_response()
        }
    }
}
