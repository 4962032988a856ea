use super::session::run_session;
use crate::application::gateway::InferenceGateway;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Accepts WebSocket clients and spawns one session per connection.
pub struct WebSocketServer {
    listener: TcpListener,
    gateway: Arc<InferenceGateway>,
    outbound_buffer: usize,
}

impl WebSocketServer {
    pub async fn bind(
        addr: &str,
        gateway: Arc<InferenceGateway>,
        outbound_buffer: usize,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        Ok(Self {
            listener,
            gateway,
            outbound_buffer: outbound_buffer.max(1),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Listener has no local address")
    }

    /// Runs the accept loop until `shutdown` flips to `true` or its sender is dropped.
    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "WebSocket gateway listening on {}",
            self.listener
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_default()
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("WebSocket gateway stopping");
                        return;
                    }
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            error!("Accept failed: {}", e);
                            continue;
                        }
                    };

                    let gateway = self.gateway.clone();
                    let buffer = self.outbound_buffer;
                    tokio::spawn(async move {
                        match tokio_tungstenite::accept_async(stream).await {
                            Ok(ws) => run_session(gateway, ws, buffer).await,
                            Err(e) => warn!("Handshake with {} failed: {}", peer, e),
                        }
                    });
                }
            }
        }
    }
}
