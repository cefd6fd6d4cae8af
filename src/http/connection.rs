use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, BufReader};

use crate::http::parser::read_request;
use crate::http::request::Request;
use crate::http::response::{timestamp, Response};
use crate::http::writer::ResponseWriter;

/// Drives one request/response exchange over a stream.
///
/// There is no keep-alive: after one response, or on the first parse
/// failure, the connection is done and should be dropped, which closes it.
pub struct Connection<S> {
    stream: BufReader<S>,
    server_name: Arc<str>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, server_name: Arc<str>) -> Self {
        Self {
            stream: BufReader::new(stream),
            server_name,
            state: ConnectionState::Reading,
        }
    }

    /// Runs the exchange to completion.
    ///
    /// A stream that closes before sending anything ends in `Ok(())` with
    /// nothing written. A malformed request ends in an error carrying a
    /// [`ParseError`](crate::http::error::ParseError), also with nothing
    /// written.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match read_request(&mut self.stream).await {
                    Ok(Some(req)) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    Ok(None) => {
                        tracing::debug!("Connection closed before a request arrived");
                        self.state = ConnectionState::Closed;
                    }
                    Err(e) => {
                        self.state = ConnectionState::Closed;
                        return Err(e.into());
                    }
                },

                ConnectionState::Processing(req) => {
                    let response = Self::handle_request(req, &self.server_name);
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    let result = writer.write_to_stream(&mut self.stream).await;
                    self.state = ConnectionState::Closed;
                    result?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    fn handle_request(req: &Request, server_name: &str) -> Response {
        tracing::info!(
            method = %req.method,
            target = %req.target,
            body_len = req.body.as_ref().map_or(0, |b| b.len()),
            "Request received"
        );
        Response::for_request(req, server_name, &timestamp())
    }
}
