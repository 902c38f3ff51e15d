//! Response building and error mapping.
//!
//! # Design Decisions
//! - Client errors get a short text message describing the problem
//! - Upstream failures get a generic message; the cause is only logged
//! - Upstream timeouts result in 504 Gateway Timeout, non-200 upstream
//!   answers in 503, everything else upstream-related in 500

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::forecast::UpstreamError;

/// Every way a request can fail, as seen by the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("not found")]
    NotFound,

    #[error("request body not allowed")]
    BodyNotAllowed,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BodyNotAllowed => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(UpstreamError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(UpstreamError::Status(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text sent to the client. Never includes upstream details.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::NotFound => "Not found",
            ApiError::BodyNotAllowed => "Request body not allowed",
            ApiError::RateLimited => "Rate limit exceeded",
            ApiError::Upstream(err) => match err {
                UpstreamError::Url(_) | UpstreamError::RequestBuild(_) => {
                    "Failed to create weather request"
                }
                UpstreamError::Timeout(_) => "Weather service timeout",
                UpstreamError::Transport(_) => "Failed to fetch weather data",
                UpstreamError::Status(_) => "Weather service unavailable",
                UpstreamError::Body(_) => "Failed to read weather data",
                UpstreamError::Parse(_) => "Failed to parse weather data",
            },
            ApiError::Serialization(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}

/// Serialize `value` into a 200 `application/json` response.
pub fn json_response<T: Serialize + ?Sized>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(value)?;
    let mut response = Response::new(Body::from(body));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(response)
}
