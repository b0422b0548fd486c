//! Request header map with names normalized at insertion.
//!
//! HTTP header names are case-insensitive per RFC 9110 §5. Rather than
//! scanning with `eq_ignore_ascii_case` on every lookup, names are
//! lower-cased once when the map is built from a parsed request.

use std::collections::HashMap;
use std::fmt;

/// A case-insensitive HTTP request header map.
///
/// Names are ASCII-lower-cased at insertion; on duplicate names the last
/// inserted value wins, matching read order in the raw header block.
///
/// # Examples
///
/// ```
/// use tinyserve::http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("User-Agent", "curl/8.5.0");
///
/// assert_eq!(headers.get("user-agent"), Some("curl/8.5.0"));
/// assert_eq!(headers.get("USER-AGENT"), Some("curl/8.5.0"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    inner: HashMap<String, String>,
}

impl HeaderMap {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header map with pre-allocated capacity for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts a header entry, replacing any previous value for the name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.inner
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Returns the value for the given header name (any case), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns `true` if the map contains an entry with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&name.to_ascii_lowercase())
    }

    /// Returns the number of header entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no header entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over all `(name, value)` pairs, names lower-cased.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_get() {
        let mut h = HeaderMap::new();
        h.insert("Content-Type", "text/plain");
        assert_eq!(h.get("content-type"), Some("text/plain"));
        assert_eq!(h.get("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(h.get("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn duplicate_name_last_wins() {
        let mut h = HeaderMap::new();
        h.insert("X-Foo", "first");
        h.insert("x-foo", "second");
        assert_eq!(h.get("X-Foo"), Some("second"));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn contains() {
        let mut h = HeaderMap::new();
        h.insert("Accept-Encoding", "gzip");
        assert!(h.contains("accept-encoding"));
        assert!(!h.contains("x-missing"));
    }

    #[test]
    fn empty() {
        let h = HeaderMap::new();
        assert!(h.is_empty());
        assert_eq!(h.get("host"), None);
    }
}
