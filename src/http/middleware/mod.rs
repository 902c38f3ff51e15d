//! Ordered request-processing stages.
//!
//! A stage either answers the request itself or delegates to the next one.
//! Stages are listed outermost first and composed once at startup.

use std::sync::Arc;

use axum::{middleware, Router};

use crate::config::RateLimitConfig;
use crate::observability::request_logger_middleware;
use crate::security::{rate_limit_middleware, security_headers_middleware, RateLimiter};

#[derive(Clone)]
pub enum Stage {
    /// Security/CORS headers; answers `OPTIONS` itself.
    SecurityHeaders,
    /// Per-address counting; answers 429 itself.
    RateLimit(Arc<RateLimiter>),
    /// Request and duration logging; always delegates.
    RequestLog,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::SecurityHeaders => "security_headers",
            Stage::RateLimit(_) => "rate_limit",
            Stage::RequestLog => "request_log",
        }
    }

    fn wrap(self, router: Router) -> Router {
        match self {
            Stage::SecurityHeaders => router.layer(middleware::from_fn(security_headers_middleware)),
            Stage::RateLimit(limiter) => {
                router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
            }
            Stage::RequestLog => router.layer(middleware::from_fn(request_logger_middleware)),
        }
    }
}

/// Security, then rate limiting (when enabled), then logging.
pub fn default_stages(config: &RateLimitConfig) -> Vec<Stage> {
    let mut stages = vec![Stage::SecurityHeaders];
    if config.enabled {
        stages.push(Stage::RateLimit(Arc::new(RateLimiter::from_config(config))));
    }
    stages.push(Stage::RequestLog);
    stages
}

/// Wrap `router` so that `stages[0]` sees each request first.
pub fn compose(router: Router, stages: Vec<Stage>) -> Router {
    // Router::layer wraps everything added so far, so go innermost first.
    stages
        .into_iter()
        .rev()
        .fold(router, |router, stage| {
            tracing::debug!(stage = stage.name(), "Adding middleware stage");
            stage.wrap(router)
        })
}
