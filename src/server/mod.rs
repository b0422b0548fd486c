//! Async TCP server and per-connection session loop.
//!
//! Accepts TCP connections and runs one detached task per connection.
//! Each session drives the read → frame → parse → dispatch → write loop
//! until the peer disconnects, asks to close, or sends a malformed stream.
//! HTTP/1.1 persistent connections and pipelining are supported out of the
//! box: frames already buffered are served before the socket is read again.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::compress;
use crate::http::{FrameReader, FrameStatus, Request};
use crate::router::Router;

/// Errors produced by the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// The tinyserve HTTP server.
///
/// Binds to a TCP address and serves requests through a [`Router`].
///
/// # Examples
///
/// ```rust,no_run
/// use tinyserve::router::Router;
/// use tinyserve::server::Server;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = Server::bind("127.0.0.1:4221").await?;
///     server.run(Router::new(".")).await?;
///     Ok(())
/// }
/// ```
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the server to the given TCP address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound
    /// (e.g. port already in use, insufficient permissions).
    pub async fn bind(addr: impl AsRef<str>) -> Result<Self, ServerError> {
        let addr = addr.as_ref();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: addr.to_owned(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Starts accepting connections and serving requests.
    ///
    /// The router is wrapped in an [`Arc`] and shared across all spawned
    /// connection tasks; its serving directory is read-only after this call.
    /// Sessions are fully independent: one connection failing never affects
    /// another, and no session error is fatal to the accept loop.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the TCP listener itself fails.
    pub async fn run(self, router: Router) -> Result<(), ServerError> {
        let router = Arc::new(router);
        info!(
            address = %self.local_addr,
            directory = %router.directory().display(),
            "tinyserve listening"
        );

        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            debug!(peer = %peer_addr, "connection accepted");
            let router = Arc::clone(&router);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, router).await {
                    warn!(peer = %peer_addr, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Drives one connection over its lifetime.
///
/// Within a connection, requests are processed and responses written
/// strictly in frame-completion order. The session ends on peer disconnect,
/// an I/O error, a framing error (no response is sent), or after honoring
/// `Connection: close`.
async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    router: Arc<Router>,
) -> Result<(), std::io::Error> {
    let mut reader = FrameReader::new();

    loop {
        // Drain frames already buffered before touching the socket again,
        // so a pipelined batch gets all its responses from one read.
        let frame = match reader.next_frame() {
            Ok(FrameStatus::Complete(frame)) => frame,
            Ok(FrameStatus::NeedMoreData) => {
                let bytes_read = stream.read_buf(reader.buffer_mut()).await?;
                if bytes_read == 0 {
                    debug!(peer = %peer_addr, "connection closed by peer");
                    break;
                }
                continue;
            }
            Err(e) => {
                // Framing errors get no response; drop the connection.
                warn!(peer = %peer_addr, error = %e, "malformed request stream");
                break;
            }
        };

        let request = Request::parse(&frame);
        debug!(
            peer = %peer_addr,
            method = %request.method(),
            path = %request.path(),
            "dispatching request"
        );

        let mut response = router.dispatch(&request).await;

        if !response.body_ref().is_empty() && request.accepts_gzip() {
            match compress::gzip_encode(response.body_ref()) {
                Ok(compressed) => {
                    response.set_body(compressed);
                    response.add_header("Content-Encoding", "gzip");
                }
                // Fall back to the identity body; never fail the response.
                Err(e) => warn!(peer = %peer_addr, error = %e, "gzip encode failed"),
            }
        }

        let close = request.wants_close();
        if close {
            response.add_header("Connection", "close");
        }

        stream.write_all(&response.encode()).await?;
        stream.flush().await?;

        if close {
            debug!(peer = %peer_addr, "Connection: close — shutting down");
            break;
        }
    }

    Ok(())
}
