//! HTTP server setup and connection handling.
//!
//! # Responsibilities
//! - Create the Axum router with both endpoints and the 404 fallback
//! - Wire up middleware (request ID, pipeline stages, response timeout)
//! - Accept connections with per-connection header limits and timeouts
//! - Drain in-flight connections on shutdown within the grace period

use std::net::SocketAddr;
use std::time::Duration;

use axum::{routing::any, Router};
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::{conn::auto, graceful::GracefulShutdown},
    service::TowerToHyperService,
};
use tokio::net::TcpListener;
use tower::Service;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::config::ServerConfig;
use crate::forecast::UpstreamClient;
use crate::http::handlers;
use crate::http::middleware::{compose, default_stages, Stage};
use crate::lifecycle::ShutdownSignal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// Error type for a server run.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("in-flight requests did not finish within {0:?}")]
    DrainTimeout(Duration),
}

/// Build the full application router.
///
/// Layering, outermost first: request ID, `stages`, response timeout, routes.
#[allow(deprecated)]
pub fn build_router(config: &ServerConfig, state: AppState, stages: Vec<Stage>) -> Router {
    let routes = Router::new()
        .route("/api/health", any(handlers::health))
        .route("/api/weather", any(handlers::weather))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(config.timeouts.write()));

    compose(routes, stages)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// HTTP server for the weather gateway.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the default stage order.
    pub fn new(config: ServerConfig, upstream: UpstreamClient) -> Self {
        let stages = default_stages(&config.rate_limit);
        let router = build_router(&config, AppState { upstream }, stages);
        Self { router, config }
    }

    /// The composed router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn connection_builder(&self) -> auto::Builder<TokioExecutor> {
        let listener = &self.config.listener;
        let timeouts = &self.config.timeouts;

        let mut builder = auto::Builder::new(TokioExecutor::new());
        builder
            .http1()
            .timer(TokioTimer::new())
            .header_read_timeout(timeouts.read())
            .max_buf_size(listener.max_header_bytes);
        builder
            .http2()
            .timer(TokioTimer::new())
            .max_header_list_size(u32::try_from(listener.max_header_bytes).unwrap_or(u32::MAX))
            .keep_alive_interval(Some(timeouts.idle()));
        builder
    }

    /// Serve connections from `listener` until `shutdown` fires, then drain.
    ///
    /// Returns `ServerError::DrainTimeout` if connections are still busy after
    /// the configured grace period.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let builder = self.connection_builder();
        let grace = self.config.timeouts.shutdown_grace();
        let graceful = GracefulShutdown::new();
        let mut make_service = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };

                    let tower_service = match make_service.call(peer).await {
                        Ok(service) => service,
                        Err(never) => match never {},
                    };
                    let conn = builder
                        .serve_connection(TokioIo::new(stream), TowerToHyperService::new(tower_service))
                        .into_owned();
                    let conn = graceful.watch(conn);

                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            tracing::debug!(peer = %peer, error = %e, "Connection ended with error");
                        }
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        drop(listener);
        tracing::info!(grace = ?grace, "Draining in-flight requests");

        match tokio::time::timeout(grace, graceful.shutdown()).await {
            Ok(()) => {
                tracing::info!("HTTP server stopped");
                Ok(())
            }
            Err(_) => Err(ServerError::DrainTimeout(grace)),
        }
    }
}
