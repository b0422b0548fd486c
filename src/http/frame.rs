//! Incremental HTTP/1.1 request framing.
//!
//! A TCP read delivers an arbitrary slice of the request stream: a single
//! read can carry zero, one, or several pipelined requests, and one request
//! can span many reads. [`FrameReader`] accumulates those reads and yields
//! complete, self-delimited [`RequestFrame`]s, leaving any surplus bytes
//! buffered for the next frame.

use bytes::{Bytes, BytesMut};
use thiserror::Error;

/// Maximum bytes buffered while still searching for the header terminator (64 KiB).
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Maximum size of a complete frame, headers plus body (8 MiB).
pub const MAX_FRAME_BYTES: usize = 8 * 1024 * 1024;

/// Initial read buffer capacity per connection.
const INITIAL_BUF_SIZE: usize = 4096;

/// Framing errors. All of them are fatal to the connection: the peer gets no
/// response and the socket is closed.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("no header terminator within {MAX_HEADER_BYTES} buffered bytes")]
    HeadersTooLarge,

    #[error("frame of {len} bytes exceeds the {MAX_FRAME_BYTES}-byte cap")]
    FrameTooLarge { len: usize },
}

/// One complete HTTP request frame: the header block including its
/// terminating `\r\n\r\n`, followed by exactly `Content-Length` body bytes.
#[derive(Debug, Clone)]
pub struct RequestFrame {
    bytes: Bytes,
    header_len: usize,
}

impl RequestFrame {
    /// The whole frame, headers plus body.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The header block, including the `\r\n\r\n` terminator.
    pub fn header_block(&self) -> &[u8] {
        &self.bytes[..self.header_len]
    }

    /// Length of the header block in bytes.
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// The body bytes as a cheap slice of the frame.
    pub fn body(&self) -> Bytes {
        self.bytes.slice(self.header_len..)
    }

    /// Total frame length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the frame is empty. Never true for extracted frames.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Outcome of a [`FrameReader::next_frame`] attempt.
#[derive(Debug)]
pub enum FrameStatus {
    /// A complete frame was extracted; its bytes are gone from the buffer.
    Complete(RequestFrame),
    /// The buffered data does not yet hold a complete frame.
    NeedMoreData,
}

/// Accumulates raw socket reads and extracts complete request frames.
///
/// The terminator scan is incremental: once a prefix of the buffer is known
/// not to contain `\r\n\r\n`, later scans resume at most three bytes before
/// the end of that prefix (the terminator can straddle two reads), never
/// from offset zero.
///
/// # Examples
///
/// ```
/// use tinyserve::http::{FrameReader, FrameStatus};
///
/// let mut reader = FrameReader::new();
/// reader.extend(b"GET / HTTP/1.1\r\n");
/// assert!(matches!(reader.next_frame().unwrap(), FrameStatus::NeedMoreData));
///
/// reader.extend(b"Host: localhost\r\n\r\n");
/// let FrameStatus::Complete(frame) = reader.next_frame().unwrap() else {
///     panic!("expected a complete frame");
/// };
/// assert_eq!(frame.len(), frame.header_len());
/// ```
#[derive(Debug)]
pub struct FrameReader {
    buf: BytesMut,
    /// Buffer prefix already known not to contain the terminator.
    scanned: usize,
    /// Cached end-of-headers offset while waiting for the body to arrive.
    headers_end: Option<usize>,
}

impl FrameReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUF_SIZE),
            scanned: 0,
            headers_end: None,
        }
    }

    /// Appends a chunk of raw bytes from the socket.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Mutable access to the accumulation buffer, for `read_buf`.
    pub fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }

    /// Number of bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Attempts to extract the next complete frame from the buffered data.
    ///
    /// On [`FrameStatus::Complete`] exactly the frame's bytes are removed
    /// from the front of the buffer; surplus bytes stay buffered and belong
    /// to the next pipelined frame.
    ///
    /// # Errors
    ///
    /// - [`FrameError::HeadersTooLarge`] — more than [`MAX_HEADER_BYTES`]
    ///   accumulated without a header terminator.
    /// - [`FrameError::FrameTooLarge`] — the declared frame exceeds
    ///   [`MAX_FRAME_BYTES`].
    pub fn next_frame(&mut self) -> Result<FrameStatus, FrameError> {
        let Some(headers_end) = self.find_headers_end() else {
            if self.buf.len() > MAX_HEADER_BYTES {
                return Err(FrameError::HeadersTooLarge);
            }
            return Ok(FrameStatus::NeedMoreData);
        };

        let content_length = content_length(&self.buf[..headers_end]);
        let total = headers_end + content_length;
        if total > MAX_FRAME_BYTES {
            return Err(FrameError::FrameTooLarge { len: total });
        }

        if self.buf.len() < total {
            return Ok(FrameStatus::NeedMoreData);
        }

        let bytes = self.buf.split_to(total).freeze();
        self.scanned = 0;
        self.headers_end = None;

        Ok(FrameStatus::Complete(RequestFrame {
            bytes,
            header_len: headers_end,
        }))
    }

    /// Locates the offset just past `\r\n\r\n`, resuming the previous scan.
    fn find_headers_end(&mut self) -> Option<usize> {
        if let Some(end) = self.headers_end {
            return Some(end);
        }

        // The terminator can straddle the previous chunk boundary.
        let start = self.scanned.saturating_sub(3);
        if let Some(pos) = self.buf[start..].windows(4).position(|w| w == b"\r\n\r\n") {
            let end = start + pos + 4;
            self.headers_end = Some(end);
            return Some(end);
        }

        self.scanned = self.buf.len();
        None
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts `Content-Length` from a raw header block.
///
/// The name match is case-insensitive; on duplicates the last occurrence
/// wins. Absent, empty, or non-numeric values all mean a zero-length body —
/// a cosmetic header error does not kill an otherwise-valid request.
fn content_length(header_block: &[u8]) -> usize {
    let Ok(text) = std::str::from_utf8(header_block) else {
        return 0;
    };

    let mut length = 0;
    for line in text.split("\r\n").skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    length
}
