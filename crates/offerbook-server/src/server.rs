//! HTTP serve loop.
//!
//! Built on Hyper and Tokio: a TCP listener feeds one spawned task per
//! connection, each request's body is collected up front, and the buffered
//! request is handed to the [`App`] for dispatch. Timeouts bound body
//! collection and handler execution; a shutdown signal drains in-flight
//! connections before the process exits.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::app::App;
use crate::config::ServerConfig;
use crate::context::RequestParts;
use crate::response::error_page;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Type alias for the HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the configured address.
    #[error("bind error: {0}")]
    Bind(String),

    /// I/O error during server operation.
    #[error("i/o error: {0}")]
    Io(String),
}

/// The Offerbook HTTP server.
pub struct Server {
    config: ServerConfig,
    app: Arc<App>,
}

impl Server {
    /// Creates a server over an application.
    #[must_use]
    pub fn new(config: ServerConfig, app: App) -> Self {
        Self {
            config,
            app: Arc::new(app),
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs the server until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs the server with a caller-controlled shutdown signal.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!("invalid address '{}': {e}", self.config.http_addr()))
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("failed to bind to {addr}: {e}")))?;

        tracing::info!(%addr, "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) =
                                    server.handle_connection(stream, remote_addr, shutdown).await
                                {
                                    tracing::error!(%remote_addr, error = %e, "connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                _ = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            active = tracker.active_connections(),
            "waiting for in-flight connections"
        );

        tokio::select! {
            _ = tracker.drained() => {
                tracing::info!("all connections closed");
            }
            _ = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    active = tracker.active_connections(),
                    "shutdown timeout reached with connections still active"
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: tokio::net::TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);

        tokio::select! {
            result = conn => result,
            _ = shutdown.recv() => {
                tracing::debug!(%remote_addr, "connection closed due to shutdown");
                Ok(())
            }
        }
    }

    async fn handle_request(
        self: &Arc<Self>,
        req: Request<Incoming>,
    ) -> Result<HttpResponse, Infallible> {
        let timeout = self.config.request_timeout();
        let (head, body) = req.into_parts();

        let body = match tokio::time::timeout(timeout, body.collect()).await {
            Ok(Ok(collected)) => collected.to_bytes(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to collect request body");
                return Ok(error_page(
                    StatusCode::BAD_REQUEST,
                    "failed to read the request body",
                )
                .map(Full::new));
            }
            Err(_) => {
                tracing::warn!("request body collection timed out");
                return Ok(error_page(
                    StatusCode::REQUEST_TIMEOUT,
                    "request body collection timed out",
                )
                .map(Full::new));
            }
        };

        let parts = RequestParts::new(head.method, head.uri, head.headers, body);

        match tokio::time::timeout(timeout, self.app.handle(parts)).await {
            Ok(response) => Ok(response.map(Full::new)),
            Err(_) => {
                tracing::warn!("handler execution timed out");
                Ok(
                    error_page(StatusCode::GATEWAY_TIMEOUT, "handler execution timed out")
                        .map(Full::new),
                )
            }
        }
    }
}
