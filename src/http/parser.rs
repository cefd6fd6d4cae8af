use std::io::ErrorKind;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncBufRead, AsyncReadExt};

use crate::http::error::ParseError;
use crate::http::line::{read_line, MAX_LINE_LEN};
use crate::http::request::{Body, Headers, Request};

/// Upper bound for a single body read.
pub const BODY_CHUNK_SIZE: usize = 1024;

enum ParseState {
    AwaitStartLine,
    AwaitHeaders(Request),
    AwaitBody(Request, usize),
    Done(Request),
}

/// Reads one request off the stream.
///
/// Returns `Ok(None)` if the stream closed before a start-line arrived,
/// which is how idle or reset connections look. The reader is left
/// positioned right after the body.
pub async fn read_request<R>(reader: &mut R) -> Result<Option<Request>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut state = ParseState::AwaitStartLine;

    loop {
        state = match state {
            ParseState::AwaitStartLine => {
                let Some(line) = next_line(reader, ParseError::MalformedStartLine).await? else {
                    return Ok(None);
                };
                let (method, target, version) = parse_start_line(&line)?;
                ParseState::AwaitHeaders(Request {
                    method,
                    target,
                    version,
                    headers: Headers::new(),
                    body: None,
                })
            }

            ParseState::AwaitHeaders(mut req) => {
                match next_line(reader, ParseError::MalformedHeaderLine).await? {
                    Some(line) if !line.is_empty() => {
                        let (name, value) = parse_header_line(&line)?;
                        if !req.headers.insert(name, value) {
                            tracing::debug!(line = %line, "Ignoring duplicate header");
                        }
                        ParseState::AwaitHeaders(req)
                    }
                    // Blank line, or the peer stopped sending: the head is complete.
                    _ => match req.content_length()? {
                        Some(len) if len > 0 => ParseState::AwaitBody(req, len),
                        _ => ParseState::Done(req),
                    },
                }
            }

            ParseState::AwaitBody(mut req, len) => {
                let bytes = read_body(reader, len).await?;
                req.body = Some(Body::new(bytes));
                ParseState::Done(req)
            }

            ParseState::Done(req) => return Ok(Some(req)),
        };
    }
}

/// Reads a line, reporting an over-long one as `malformed`.
async fn next_line<R>(
    reader: &mut R,
    malformed: fn(String) -> ParseError,
) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    match read_line(reader).await {
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            Err(malformed(format!("line longer than {} bytes", MAX_LINE_LEN)))
        }
        other => Ok(other?),
    }
}

/// Splits a start-line into method, target and version.
pub fn parse_start_line(line: &str) -> Result<(String, String, String), ParseError> {
    if !line.contains("HTTP/") {
        return Err(ParseError::MalformedStartLine(line.to_string()));
    }

    let parts: Vec<&str> = line.split(' ').map(str::trim).collect();
    match parts.as_slice() {
        [method, target, version] => Ok((
            method.to_string(),
            target.to_string(),
            version.to_string(),
        )),
        _ => Err(ParseError::MalformedStartLine(line.to_string())),
    }
}

/// Splits a header line at its first `:`. The value is trimmed, the name is not.
pub fn parse_header_line(line: &str) -> Result<(String, String), ParseError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| ParseError::MalformedHeaderLine(line.to_string()))?;

    Ok((name.to_string(), value.trim().to_string()))
}

/// Reads exactly `len` body bytes, at most [`BODY_CHUNK_SIZE`] per read.
pub async fn read_body<R>(reader: &mut R, len: usize) -> Result<Bytes, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    // Grow with what actually arrives; the announced length is untrusted.
    let mut body = BytesMut::with_capacity(len.min(BODY_CHUNK_SIZE));
    let mut chunk = [0u8; BODY_CHUNK_SIZE];

    while body.len() < len {
        let want = (len - body.len()).min(BODY_CHUNK_SIZE);
        let n = reader.read(&mut chunk[..want]).await?;

        if n == 0 {
            return Err(ParseError::PrematureClose {
                expected: len,
                received: body.len(),
            });
        }

        body.extend_from_slice(&chunk[..n]);
    }

    Ok(body.freeze())
}
