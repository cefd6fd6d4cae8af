use bytes::Bytes;

use crate::http::error::ParseError;

/// Request header fields in the order they arrived.
///
/// Names are case-sensitive as received. When a name repeats, the first
/// occurrence is kept and later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a header unless the name is already present.
    ///
    /// Returns `false` when the header was ignored as a duplicate.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.get(&name).is_some() {
            return false;
        }
        self.entries.push((name, value.into()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Request body: the raw bytes plus their UTF-8 reading.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD in [`Body::content`];
/// [`Body::bytes`] is always exactly what was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    bytes: Bytes,
    content: String,
}

impl Body {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let content = String::from_utf8_lossy(&bytes).into_owned();
        Self { bytes, content }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A parsed HTTP request.
///
/// Lives only as long as the connection it was read from.
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method exactly as sent (e.g. "GET")
    pub method: String,
    /// Request target (e.g. "/index.html")
    pub target: String,
    /// Protocol version token (e.g. "HTTP/1.1")
    pub version: String,
    pub headers: Headers,
    /// Present only when a non-zero `Content-Length` was announced
    pub body: Option<Body>,
}

impl Request {
    /// Looks up a header by its exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Parses the `Content-Length` header, if present.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        self.header("Content-Length")
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength(v.to_string()))
            })
            .transpose()
    }

    /// The body decoded as UTF-8, if there is one.
    pub fn content(&self) -> Option<&str> {
        self.body.as_ref().map(Body::content)
    }
}
