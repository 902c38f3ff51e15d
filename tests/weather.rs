//! `/api/weather` against a mock forecast API.

use std::time::Duration;

use axum::http::{header, StatusCode};
use serde_json::Value;

mod common;

use common::{
    assert_security_headers, closed_port, request, send, start_mock_backend,
    start_programmable_backend, start_truncating_backend, test_app, test_config,
};

const UNEQUAL_PAYLOAD: &str = r#"{
    "latitude": 41.05,
    "hourly": {
        "time": ["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00"],
        "temperature_2m": [5.1, 4.7],
        "wind_speed_10m": [10.0, 11.0, 12.0]
    }
}"#;

#[tokio::test]
async fn reshapes_columns_into_rows() {
    let upstream = start_mock_backend(UNEQUAL_PAYLOAD).await;
    let app = test_app(test_config(upstream));

    let (status, headers, body) = send(&app, request("GET", "/api/weather")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=300");
    assert_security_headers(&headers);

    let records: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        records,
        serde_json::json!([
            {"time": "2024-01-01T00:00", "temperature_2m": 5.1},
            {"time": "2024-01-01T01:00", "temperature_2m": 4.7}
        ])
    );
}

#[tokio::test]
async fn sends_configured_coordinates_and_fields() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let upstream = start_programmable_backend(move |head| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(head);
            (200, r#"{"hourly":{"time":[],"temperature_2m":[]}}"#.to_string())
        }
    })
    .await;
    let app = test_app(test_config(upstream));

    let (status, _, body) = send(&app, request("GET", "/api/weather")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"[]");

    let head = rx.recv().await.unwrap();
    let request_line = head.lines().next().unwrap();
    assert!(request_line.starts_with("GET /v1/forecast?"), "{request_line}");
    assert!(request_line.contains("latitude=41.05"));
    assert!(request_line.contains("longitude=28.72"));
    assert!(request_line.contains("hourly=temperature_2m%2Crelative_humidity_2m%2Cwind_speed_10m"));
}

#[tokio::test]
async fn upstream_non_200_is_service_unavailable() {
    let upstream =
        start_programmable_backend(|_| async { (500, r#"{"error":true}"#.to_string()) }).await;
    let app = test_app(test_config(upstream));

    let (status, headers, body) = send(&app, request("GET", "/api/weather")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body[..], b"Weather service unavailable");
    assert!(headers.get(header::CACHE_CONTROL).is_none());
    assert_security_headers(&headers);
}

#[tokio::test]
async fn upstream_timeout_is_gateway_timeout() {
    let upstream = start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, UNEQUAL_PAYLOAD.to_string())
    })
    .await;
    let mut config = test_config(upstream);
    config.timeouts.upstream_ms = 200;
    let app = test_app(config);

    let (status, _, body) = send(&app, request("GET", "/api/weather")).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(&body[..], b"Weather service timeout");
}

#[tokio::test]
async fn slow_upstream_hits_response_deadline() {
    let upstream = start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, UNEQUAL_PAYLOAD.to_string())
    })
    .await;
    let mut config = test_config(upstream);
    config.timeouts.write_secs = 1;
    let app = test_app(config);

    let (status, headers, _) = send(&app, request("GET", "/api/weather")).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert!(headers.get(header::CACHE_CONTROL).is_none());
    assert_security_headers(&headers);
}

#[tokio::test]
async fn truncated_payload_is_internal_error() {
    let upstream = start_truncating_backend(r#"{"hourly":{"time":["#, 512).await;
    let app = test_app(test_config(upstream));

    let (status, headers, body) = send(&app, request("GET", "/api/weather")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body[..], b"Failed to read weather data");
    assert_security_headers(&headers);
}

#[tokio::test]
async fn unparseable_payload_is_internal_error() {
    let upstream = start_mock_backend("<html>not json</html>").await;
    let app = test_app(test_config(upstream));

    let (status, _, body) = send(&app, request("GET", "/api/weather")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body[..], b"Failed to parse weather data");
}

#[tokio::test]
async fn unreachable_upstream_is_internal_error() {
    let app = test_app(test_config(closed_port().await));

    let (status, _, body) = send(&app, request("GET", "/api/weather")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(&body[..], b"Failed to fetch weather data");
}

#[tokio::test]
async fn weather_rejects_non_get_methods() {
    let app = test_app(test_config(closed_port().await));

    for method in ["POST", "PUT", "DELETE"] {
        let (status, _, _) = send(&app, request(method, "/api/weather")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method {method}");
    }
}
