use std::fmt;

/// Failures that end the handling of a single connection.
///
/// None of these are reported to the client: the connection is closed
/// without a response and the error is logged by whoever drove the
/// [`Connection`](crate::http::connection::Connection).
#[derive(Debug)]
pub enum ParseError {
    /// Start-line without an `HTTP/` token, or not exactly three tokens.
    MalformedStartLine(String),
    /// Header line without a `:` separator.
    MalformedHeaderLine(String),
    /// `Content-Length` value is not a non-negative integer.
    InvalidContentLength(String),
    /// Stream ended before the announced body was fully read.
    PrematureClose { expected: usize, received: usize },
    /// Transport error while reading the request.
    Io(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedStartLine(line) => {
                write!(f, "malformed start-line: {:?}", line)
            }
            ParseError::MalformedHeaderLine(line) => {
                write!(f, "malformed header line: {:?}", line)
            }
            ParseError::InvalidContentLength(value) => {
                write!(f, "invalid Content-Length: {:?}", value)
            }
            ParseError::PrematureClose { expected, received } => write!(
                f,
                "connection closed after {} of {} body bytes",
                received, expected
            ),
            ParseError::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}
