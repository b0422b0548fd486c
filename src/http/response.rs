//! HTTP/1.1 response builder and wire encoder.
//!
//! Responses carry an ordered header list for wire fidelity: headers are
//! written exactly in the order they were added, and none is ever removed.
//! `Content-Length` is not stored at all — it is computed from the final
//! body at serialization time, so it can never go stale when the
//! compression step swaps the body out.

use bytes::{BufMut, BytesMut};

use super::StatusCode;

/// An HTTP/1.1 response, ready to be serialized and sent.
///
/// # Examples
///
/// ```
/// use tinyserve::http::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body("abc");
///
/// let bytes = response.encode();
/// let text = std::str::from_utf8(&bytes).unwrap();
/// assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
/// assert!(text.contains("Content-Length: 3\r\n"));
/// assert!(text.ends_with("\r\n\r\nabc"));
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// Creates a new response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Appends a response header. Order of addition is the wire order.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Appends a header in-place. Used by the compression and close-policy
    /// steps, which decorate a finished response without consuming it.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Sets the response body from a string.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Sets the response body from raw bytes.
    #[must_use]
    pub fn body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Replaces the body in-place. Used by the compression step.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// Returns the status code of this response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the current body bytes.
    pub fn body_ref(&self) -> &[u8] {
        &self.body
    }

    /// Serializes the response into HTTP/1.1 wire format.
    ///
    /// Layout: status line, headers in insertion order, `Content-Length`
    /// computed from the final body, a blank line, then the body bytes.
    pub fn encode(self) -> BytesMut {
        let estimated = 64 + self.headers.len() * 48 + self.body.len();
        let mut buf = BytesMut::with_capacity(estimated);

        buf.put(
            format!(
                "HTTP/1.1 {} {}\r\n",
                self.status.as_u16(),
                self.status.canonical_reason()
            )
            .as_bytes(),
        );

        for (name, value) in &self.headers {
            buf.put(format!("{name}: {value}\r\n").as_bytes());
        }

        buf.put(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        buf.put(&b"\r\n"[..]);

        if !self.body.is_empty() {
            buf.put(self.body.as_slice());
        }

        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(bytes: BytesMut) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn simple_ok_response() {
        let r = Response::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .body("Hello");
        let s = to_string(r.encode());
        assert!(s.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(s.contains("Content-Type: text/plain\r\n"));
        assert!(s.contains("Content-Length: 5\r\n"));
        assert!(s.ends_with("\r\n\r\nHello"));
    }

    #[test]
    fn empty_body_still_has_content_length() {
        let r = Response::new(StatusCode::Ok);
        let s = to_string(r.encode());
        assert_eq!(s, "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn headers_written_in_insertion_order() {
        let r = Response::new(StatusCode::Ok)
            .header("X-First", "1")
            .header("X-Second", "2");
        let s = to_string(r.encode());
        let first = s.find("X-First").unwrap();
        let second = s.find("X-Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn content_length_tracks_replaced_body() {
        let mut r = Response::new(StatusCode::Ok).body("a long placeholder body");
        r.set_body(b"xy".to_vec());
        let s = to_string(r.encode());
        assert!(s.contains("Content-Length: 2\r\n"));
        assert!(s.ends_with("xy"));
    }

    #[test]
    fn not_found() {
        let r = Response::new(StatusCode::NotFound);
        let s = to_string(r.encode());
        assert!(s.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn created() {
        let r = Response::new(StatusCode::Created);
        let s = to_string(r.encode());
        assert!(s.starts_with("HTTP/1.1 201 Created\r\n"));
    }
}
