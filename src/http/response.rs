use chrono::Local;

use crate::http::request::Request;

/// The only status this server ever sends.
pub const STATUS_LINE: &str = "HTTP/1.1 200 OK";

pub const CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Body sent when the request carried none.
pub const DEFAULT_CONTENT: &str = "This is a default response content by sockhttp...";

/// Layout of the timestamp appended to every body.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A response ready to be serialized.
///
/// Headers keep their insertion order on the wire.
#[derive(Debug, Clone)]
pub struct Response {
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Builds a `200 OK` response around `body`.
    ///
    /// `Content-Length` is the byte length of the encoded body, never its
    /// character count.
    pub fn ok(server: &str, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        let headers = vec![
            ("Server".to_string(), server.to_string()),
            ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ("Content-Length".to_string(), body.len().to_string()),
        ];
        Self { headers, body }
    }

    /// Echoes the request body back, or sends [`DEFAULT_CONTENT`] when
    /// there was no body. Either way the body ends with `\r\n<timestamp>`.
    pub fn for_request(req: &Request, server: &str, timestamp: &str) -> Self {
        let content = match &req.body {
            Some(body) if !body.is_empty() => body.content(),
            _ => DEFAULT_CONTENT,
        };
        Self::ok(server, format!("{}\r\n{}", content, timestamp))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
