//! gzip compression boundary.
//!
//! Thin glue over flate2's deflate-with-gzip-wrapper encoder plus the
//! `Accept-Encoding` negotiation check. Compression is applied by the
//! connection session only when the response body is non-empty and the
//! peer listed `gzip`.

use std::io::{self, Write};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Encodes `input` as gzip at the default compression level.
///
/// Deterministic for identical input. On failure the caller falls back to
/// sending the uncompressed body.
pub fn gzip_encode(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(input)?;
    encoder.finish()
}

/// Returns `true` if the `Accept-Encoding` value lists the `gzip` token.
///
/// The value is split on commas with at most one leading space stripped per
/// token; the match is an exact, case-sensitive comparison against `gzip`.
pub fn accepts_gzip(accept_encoding: &str) -> bool {
    accept_encoding
        .split(',')
        .map(|token| token.strip_prefix(' ').unwrap_or(token))
        .any(|token| token == "gzip")
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    #[test]
    fn encode_round_trips_through_decoder() {
        let compressed = gzip_encode(b"abc").unwrap();
        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn encode_is_deterministic() {
        let a = gzip_encode(b"same input").unwrap();
        let b = gzip_encode(b"same input").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn accepts_single_token() {
        assert!(accepts_gzip("gzip"));
    }

    #[test]
    fn accepts_token_in_list() {
        assert!(accepts_gzip("deflate, gzip, br"));
        assert!(accepts_gzip("deflate,gzip"));
    }

    #[test]
    fn rejects_missing_or_mangled_token() {
        assert!(!accepts_gzip("deflate, br"));
        assert!(!accepts_gzip("GZIP"));
        assert!(!accepts_gzip("gzipped"));
        assert!(!accepts_gzip(""));
    }

    #[test]
    fn only_one_leading_space_stripped() {
        assert!(accepts_gzip("deflate, gzip"));
        // Two spaces leave " gzip", which is not an exact match.
        assert!(!accepts_gzip("deflate,  gzip"));
    }
}
