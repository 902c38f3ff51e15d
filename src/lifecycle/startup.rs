//! Startup orchestration.
//!
//! Order: metrics exporter, upstream client, bind, serve, wait for a signal,
//! drain. Any startup error is fatal; so is a drain that overruns the grace
//! period or a server that fails before any signal arrives.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::forecast::UpstreamClient;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Error type for a full service run.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] std::net::AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to build forecast client: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Run the service until a shutdown signal has been handled.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let upstream = UpstreamClient::new(config.upstream.clone(), config.timeouts.upstream())?;

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, upstream);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    supervise(server_task, &shutdown, signals::shutdown_signal()).await
}

/// Wait for either `signal` or the server task, whichever comes first.
///
/// A signal triggers `shutdown` and waits for the drain. A server task that
/// ends on its own surfaces its result immediately.
async fn supervise<S>(
    mut server_task: JoinHandle<Result<(), ServerError>>,
    shutdown: &Shutdown,
    signal: S,
) -> Result<(), StartupError>
where
    S: Future<Output = io::Result<()>>,
{
    tokio::select! {
        signal = signal => {
            signal.map_err(StartupError::Signal)?;
            shutdown.trigger();
            server_task.await??;
        }
        finished = &mut server_task => {
            finished??;
            tracing::warn!("HTTP server stopped without a shutdown signal");
        }
    }
    Ok(())
}
