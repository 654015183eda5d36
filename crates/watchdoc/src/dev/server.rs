//! Development HTTP server with live reload over WebSocket.
//!
//! Serves the output directory as static files and exposes the reload
//! endpoint. Every response passes through the reload-client injector.

use crate::dev::inject::inject_reload_client;
use crate::dev::reload::RELOAD_ENDPOINT;
use crate::dev::SharedState;
use crate::error::{CliError, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    middleware,
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Upper bound on how long a client may take to send request headers.
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Development server.
pub struct DevServer {
    /// Socket address to bind
    addr: SocketAddr,
    /// Shared application state
    state: SharedState,
}

impl DevServer {
    /// Create a new development server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address to listen on
    /// * `state` - Shared state holding the served root and connection registry
    pub fn new(addr: SocketAddr, state: SharedState) -> Self {
        Self { addr, state }
    }

    /// Bind the configured address and serve until the task is dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound
    pub async fn start(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Bind the configured address without serving yet.
    pub async fn bind(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(self.addr).await.map_err(|e| {
            CliError::Server(format!("Failed to bind to {}: {}", self.addr, e))
        })?;

        tracing::info!("File server started at {}", self.addr);
        Ok(listener)
    }

    /// Accept connections on an already-bound listener.
    ///
    /// Each connection is served on its own task with an HTTP/1 header-read
    /// timeout and upgrade support for the reload socket.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let app = self.router();

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    continue;
                }
            };

            let service = TowerToHyperService::new(app.clone());

            tokio::spawn(async move {
                let mut builder = Builder::new(TokioExecutor::new());
                builder
                    .http1()
                    .timer(TokioTimer::new())
                    .header_read_timeout(HEADER_READ_TIMEOUT);

                if let Err(e) = builder
                    .serve_connection_with_upgrades(TokioIo::new(stream), service)
                    .await
                {
                    tracing::debug!("Connection from {} closed with error: {}", peer, e);
                }
            });
        }
    }

    /// Build the axum router with all routes.
    ///
    /// - `GET /ws`: reload socket
    /// - everything else: static files from the served root
    ///
    /// Any origin is accepted.
    pub fn router(&self) -> Router {
        let static_files = ServeDir::new(self.state.served_root());

        Router::new()
            .route(RELOAD_ENDPOINT, get(handle_reload_socket))
            .fallback_service(static_files)
            .layer(middleware::from_fn(inject_reload_client))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self.state.clone())
    }
}

/// Upgrade to a WebSocket that only ever carries server-to-client signals.
async fn handle_reload_socket(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> Response {
    ws.on_upgrade(move |socket| serve_reload_connection(socket, state))
}

/// Park on the socket until either side goes away.
///
/// Inbound frames are read only to notice the close.
async fn serve_reload_connection(socket: WebSocket, state: SharedState) {
    let registry = &state.registry;
    let mut conn = registry.register();
    let id = conn.id();
    tracing::info!("Browser connected (total: {})", registry.count());

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            outbound = conn.recv() => match outbound {
                Some(message) => {
                    if let Err(e) = sender.send(Message::Text(message.into())).await {
                        tracing::debug!("Send to client {} failed: {}", id, e);
                        break;
                    }
                }
                // Evicted by a failed broadcast
                None => {
                    let _ = sender.close().await;
                    break;
                }
            },
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    registry.unregister(id);
    tracing::info!("Browser disconnected (total: {})", registry.count());
}
