//! TCP server for the Domus service
//!
//! Accepts connections and answers one response per request frame. All
//! domain work happens behind the `RequestHandler` the caller supplies;
//! the server itself only frames, dispatches, and logs.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::frame::{read_frame, write_frame};
use crate::protocol::{Request, Response};

/// Dispatch target for incoming requests
///
/// Handlers run on the connection task; they are expected to be quick,
/// synchronous operations.
pub trait RequestHandler: Send + Sync + 'static {
    fn handle(&self, request: Request) -> Response;
}

/// Service server handle
pub struct Server {
    addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
}

impl Server {
    /// Start a new server on the given port (0 picks an ephemeral port)
    pub async fn start(port: u16, handler: Arc<dyn RequestHandler>) -> Result<Self> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await?;
        let bound_addr = listener.local_addr()?;

        info!(addr = %bound_addr, "Server started");

        let (shutdown_tx, _) = broadcast::channel(1);

        // Spawn accept loop
        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(accept_loop(listener, handler, shutdown_rx));

        Ok(Server {
            addr: bound_addr,
            shutdown_tx,
        })
    }

    /// Get the server's bound address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
        info!("Server shutdown initiated");
    }
}

/// Accept incoming connections
async fn accept_loop(
    listener: TcpListener,
    handler: Arc<dyn RequestHandler>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        debug!(addr = %addr, "New connection");
                        let handler = handler.clone();
                        tokio::spawn(handle_connection(stream, addr, handler));
                    }
                    Err(e) => {
                        error!(error = %e, "Accept failed");
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Accept loop shutting down");
                break;
            }
        }
    }
}

/// Handle a single client connection: one response per request frame
async fn handle_connection(mut stream: TcpStream, addr: SocketAddr, handler: Arc<dyn RequestHandler>) {
    loop {
        let request: Request = match read_frame(&mut stream).await {
            Ok(request) => request,
            Err(crate::error::Error::ConnectionClosed) => {
                debug!(addr = %addr, "Connection closed");
                return;
            }
            Err(e) => {
                debug!(addr = %addr, error = %e, "Bad frame, dropping connection");
                let _ = write_frame(
                    &mut stream,
                    &Response::Error {
                        message: e.to_string(),
                    },
                )
                .await;
                return;
            }
        };

        let response = handler.handle(request);
        if let Err(e) = write_frame(&mut stream, &response).await {
            debug!(addr = %addr, error = %e, "Failed to write response");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;

    struct PingHandler;

    impl RequestHandler for PingHandler {
        fn handle(&self, request: Request) -> Response {
            match request {
                Request::Ping => Response::Pong,
                _ => Response::Error {
                    message: "unsupported".into(),
                },
            }
        }
    }

    #[tokio::test]
    async fn test_request_response_roundtrip() {
        let server = Server::start(0, Arc::new(PingHandler)).await.unwrap();
        let addr = SocketAddr::from(([127, 0, 0, 1], server.addr().port()));

        let mut client = Client::connect(addr).await.unwrap();
        let response = client.request(&Request::Ping).await.unwrap();
        assert!(matches!(response, Response::Pong));

        // The connection stays open for further requests
        let response = client.request(&Request::Ping).await.unwrap();
        assert!(matches!(response, Response::Pong));

        server.shutdown();
    }
}
