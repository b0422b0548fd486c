//! # tinyserve
//!
//! A minimal async HTTP/1.1 static file server: incremental request
//! framing, persistent connections with pipelining, `/files/` GET and
//! POST, and on-the-fly gzip compression.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tinyserve::router::Router;
//! use tinyserve::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("127.0.0.1:4221").await?;
//!     println!("Listening on http://127.0.0.1:4221");
//!     server.run(Router::new("/tmp/files")).await?;
//!     Ok(())
//! }
//! ```

pub mod compress;
pub mod http;
pub mod router;
pub mod server;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use http::{FrameReader, FrameStatus, HeaderMap, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
