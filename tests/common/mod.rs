//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::connect_info::MockConnectInfo,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;
use weather_gateway::config::ServerConfig;
use weather_gateway::forecast::UpstreamClient;
use weather_gateway::HttpServer;

/// Address every routed test request appears to come from.
pub const CLIENT_ADDR: ([u8; 4], u16) = ([192, 0, 2, 10], 51000);

/// Start a mock forecast API. `f` receives the raw request head and returns
/// the status code and JSON body to send back.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).into_owned();

                        let (status, body) = f(head).await;
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason(status),
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock forecast API that announces `declared_len` body bytes, sends
/// only `partial`, then closes the connection.
pub async fn start_truncating_backend(partial: &'static str, declared_len: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;

                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
                    declared_len
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(partial.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a mock forecast API that always answers 200 with `body`.
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_| async move { (200, body.to_string()) }).await
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Default config pointed at `upstream`, with proxies from the environment ignored.
pub fn test_config(upstream: SocketAddr) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.upstream.base_url = format!("http://{}/v1/forecast", upstream);
    config.upstream.system_proxy = false;
    config
}

pub fn test_server(config: ServerConfig) -> HttpServer {
    let upstream = UpstreamClient::new(config.upstream.clone(), config.timeouts.upstream()).unwrap();
    HttpServer::new(config, upstream)
}

/// The full router with a fixed peer address, for `oneshot` requests.
pub fn test_app(config: ServerConfig) -> Router {
    test_server(config)
        .router()
        .layer(MockConnectInfo(SocketAddr::from(CLIENT_ADDR)))
}

pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Drive one request through `app` and collect the parts worth asserting on.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body)
}

/// Assert the fixed security/CORS header set is present.
pub fn assert_security_headers(headers: &HeaderMap) {
    for (name, value) in weather_gateway::security::SECURITY_HEADERS {
        assert_eq!(
            headers.get(&name).and_then(|v| v.to_str().ok()),
            Some(value),
            "missing or wrong {}",
            name
        );
    }
}
