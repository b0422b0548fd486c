//! Lenient HTTP/1.1 request parsing.
//!
//! Parsing is deliberately tolerant: the version token is accepted and
//! ignored, header lines without a colon are skipped, and a bad
//! `Content-Length` was already treated as zero by the frame reader.
//! Framing correctness lives in [`super::frame`]; by the time a
//! [`RequestFrame`] reaches this module its boundaries are settled.

use bytes::Bytes;

use super::frame::RequestFrame;
use super::{HeaderMap, Method};

/// A fully parsed HTTP/1.1 request.
///
/// Created by [`Request::parse`] from a complete [`RequestFrame`]; never
/// mutated after construction.
///
/// # Examples
///
/// ```
/// use tinyserve::http::{FrameReader, FrameStatus, Request};
///
/// let mut reader = FrameReader::new();
/// reader.extend(b"GET /echo/hi HTTP/1.1\r\nHost: localhost\r\n\r\n");
/// let FrameStatus::Complete(frame) = reader.next_frame().unwrap() else {
///     panic!("expected a complete frame");
/// };
///
/// let request = Request::parse(&frame);
/// assert_eq!(request.method().as_str(), "GET");
/// assert_eq!(request.path(), "/echo/hi");
/// assert_eq!(request.header("HOST"), Some("localhost"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Parses a complete frame into a request.
    ///
    /// Infallible by design: a garbled request line yields empty method and
    /// path tokens, which no route matches.
    pub fn parse(frame: &RequestFrame) -> Self {
        let header_text = String::from_utf8_lossy(frame.header_block());
        let mut lines = header_text.split("\r\n");

        // METHOD SP PATH SP VERSION — the version is not validated.
        let mut parts = lines.next().unwrap_or("").split_whitespace();
        let method: Method = parts.next().unwrap_or("").parse().unwrap(); // Infallible
        let path = parts.next().unwrap_or("").to_owned();

        let mut headers = HeaderMap::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            // Lines without a colon are skipped, not fatal.
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.strip_prefix(' ').unwrap_or(value);
            headers.insert(name, value);
        }

        Self {
            method,
            path,
            headers,
            body: frame.body(),
        }
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path, verbatim through the first space.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value by name (any case).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the request body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns `true` if the response body may be gzip-compressed.
    pub fn accepts_gzip(&self) -> bool {
        self.header("accept-encoding")
            .is_some_and(crate::compress::accepts_gzip)
    }

    /// Returns `true` if the peer asked for the connection to be closed
    /// after this exchange (`Connection` value containing `close`).
    pub fn wants_close(&self) -> bool {
        self.header("connection").is_some_and(|v| v.contains("close"))
    }
}
