//! Bounded-timeout client for the forecast API.

use std::time::Duration;

use reqwest::{Client, Request, StatusCode};
use url::Url;

use crate::config::UpstreamConfig;
use crate::forecast::transform::pair_hourly;
use crate::forecast::types::{ForecastPayload, WeatherRecord};

/// Failure modes of a forecast fetch. Each maps to its own outward status.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid forecast URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build forecast request: {0}")]
    RequestBuild(#[source] reqwest::Error),

    #[error("forecast request timed out after {0:?}")]
    Timeout(Duration),

    #[error("forecast request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("forecast API returned status {0}")]
    Status(StatusCode),

    #[error("failed to read forecast body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to parse forecast payload: {0}")]
    Parse(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Url(_) | UpstreamError::RequestBuild(_) => "request_build",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Status(_) => "status",
            UpstreamError::Body(_) => "body",
            UpstreamError::Parse(_) => "parse",
        }
    }
}

/// Client for the hourly forecast endpoint.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    config: UpstreamConfig,
    timeout: Duration,
}

impl UpstreamClient {
    /// Build a client whose every call is bounded by `timeout`.
    pub fn new(config: UpstreamConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weather-gateway/", env!("CARGO_PKG_VERSION")));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
            config,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forecast URL with the configured coordinates and field set.
    pub fn forecast_url(&self) -> Result<Url, url::ParseError> {
        let mut params = vec![
            ("latitude", self.config.latitude.to_string()),
            ("longitude", self.config.longitude.to_string()),
        ];
        if !self.config.current.is_empty() {
            params.push(("current", self.config.current.join(",")));
        }
        params.push(("hourly", self.config.hourly.join(",")));

        Url::parse_with_params(&self.config.base_url, &params)
    }

    /// Fetch the hourly forecast and reshape it into records.
    pub async fn fetch_hourly(&self) -> Result<Vec<WeatherRecord>, UpstreamError> {
        let request = self
            .http
            .get(self.forecast_url()?)
            .build()
            .map_err(UpstreamError::RequestBuild)?;

        let payload = tokio::time::timeout(self.timeout, self.execute(request))
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))??;

        Ok(pair_hourly(payload.hourly))
    }

    async fn execute(&self, request: Request) -> Result<ForecastPayload, UpstreamError> {
        let response = self.http.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout(self.timeout)
            } else {
                UpstreamError::Transport(e)
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout(self.timeout)
            } else {
                UpstreamError::Body(e)
            }
        })?;

        Ok(serde_json::from_slice(&body)?)
    }
}
