//! Endpoint handlers.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request},
    response::Response,
};
use http_body_util::BodyExt;
use serde::Serialize;

use crate::http::response::{json_response, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Cache hint for weather responses: five minutes, shared caches allowed.
pub const WEATHER_CACHE_CONTROL: &str = "public, max-age=300";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            message: "Hello World!",
            status: "success",
        }
    }
}

/// `GET /api/health`. Rejects other methods and any request body.
///
/// The body is inspected frame by frame instead of buffered, so an oversized
/// body is still answered with 405 or 400 rather than a size-limit error.
pub async fn health(request: Request<Body>) -> Result<Response, ApiError> {
    if request.method() != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }
    if has_body(request.into_body()).await {
        return Err(ApiError::BodyNotAllowed);
    }

    json_response(&HealthResponse::ok())
}

/// Whether `body` carries at least one byte of data. Stops at the first
/// non-empty data frame. A body that fails mid-stream counts as present.
async fn has_body(mut body: Body) -> bool {
    while let Some(frame) = body.frame().await {
        match frame {
            Ok(frame) => {
                if frame.data_ref().is_some_and(|data| !data.is_empty()) {
                    return true;
                }
            }
            Err(_) => return true,
        }
    }
    false
}

/// `GET /api/weather`. Proxies the hourly forecast as a list of records.
pub async fn weather(State(state): State<AppState>, method: Method) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let records = match state.upstream.fetch_hourly().await {
        Ok(records) => records,
        Err(err) => {
            tracing::error!(error = %err, kind = err.kind(), "Forecast request failed");
            metrics::record_upstream(err.kind());
            return Err(err.into());
        }
    };
    metrics::record_upstream("success");
    tracing::debug!(records = records.len(), "Forecast fetched");

    let mut response = json_response(&records).inspect_err(|err| {
        tracing::error!(error = %err, "Failed to encode weather response");
    })?;
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(WEATHER_CACHE_CONTROL),
    );
    Ok(response)
}

/// Fallback for every unrouted path.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
