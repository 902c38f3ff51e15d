//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges that would otherwise fail
//! late (hyper panics on a header buffer below 8 KiB, a zero window would
//! reset on every request). All problems are reported together.

use std::fmt;

use url::Url;

use crate::config::schema::ServerConfig;

/// Smallest header buffer hyper accepts.
pub const MIN_HEADER_BYTES: usize = 8192;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::new("listener.host", "must not be empty"));
    }

    if config.listener.max_header_bytes < MIN_HEADER_BYTES {
        errors.push(ValidationError::new(
            "listener.max_header_bytes",
            format!("must be at least {}", MIN_HEADER_BYTES),
        ));
    }

    if config.timeouts.read_secs == 0 {
        errors.push(ValidationError::new("timeouts.read_secs", "must be greater than 0"));
    }
    if config.timeouts.write_secs == 0 {
        errors.push(ValidationError::new("timeouts.write_secs", "must be greater than 0"));
    }
    if config.timeouts.upstream_ms == 0 {
        errors.push(ValidationError::new("timeouts.upstream_ms", "must be greater than 0"));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::new(
                "rate_limit.max_requests",
                "must be greater than 0",
            ));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::new(
                "rate_limit.window_secs",
                "must be greater than 0",
            ));
        }
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("upstream.base_url", e.to_string())),
    }

    if config.upstream.hourly.is_empty() {
        errors.push(ValidationError::new("upstream.hourly", "must request at least one field"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
