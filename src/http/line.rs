//! Line scanning for the request head.
//!
//! Lines are byte oriented: every byte is taken as a Latin-1 character and
//! no multi-byte decoding happens here. The body is decoded separately.

use std::io::{Error, ErrorKind};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Longest line accepted, terminator excluded.
pub const MAX_LINE_LEN: usize = 8192;

/// Reads one line, without its terminator.
///
/// `\r` bytes are dropped wherever they appear and `\n` ends the line, so
/// both `CRLF` and bare `LF` endings are accepted.
///
/// Returns `Ok(None)` when the stream ends before a `\n` is seen. That is
/// distinct from `Ok(Some(""))`, the blank line that ends a header block.
/// Anything read before the end of the stream is discarded.
///
/// A line longer than [`MAX_LINE_LEN`] bytes fails with
/// [`ErrorKind::InvalidData`].
pub async fn read_line<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let mut scanned = 0;

    loop {
        let (found, used) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(None);
            }

            let (segment, found) = match available.iter().position(|&b| b == b'\n') {
                Some(end) => (&available[..end], true),
                None => (available, false),
            };

            scanned += segment.iter().filter(|&&b| b != b'\r').count();
            if scanned > MAX_LINE_LEN {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("line exceeds {} bytes", MAX_LINE_LEN),
                ));
            }

            push_latin1(&mut line, segment);
            (found, segment.len() + usize::from(found))
        };

        reader.consume(used);

        if found {
            return Ok(Some(line));
        }
    }
}

fn push_latin1(line: &mut String, bytes: &[u8]) {
    line.extend(bytes.iter().filter(|&&b| b != b'\r').map(|&b| b as char));
}
