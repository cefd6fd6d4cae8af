//! HTTP/1.1 framing, written directly against byte streams.
//!
//! # Architecture
//!
//! - **`line`**: reads CRLF (or bare LF) terminated lines off a buffered stream
//! - **`parser`**: turns lines and body bytes into a [`request::Request`]
//! - **`request`**: the parsed request, its ordered headers and optional body
//! - **`response`**: the fixed-shape `200 OK` response and its body rules
//! - **`writer`**: serializes a response and closes the write side
//! - **`connection`**: the per-connection state machine tying these together
//! - **`error`**: the ways a single exchange can fail
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← start-line, headers, optional body
//!        └──────┬──────┘
//!               │ request parsed          ── stream empty ──▶ Closed
//!               ▼                         ── malformed ─────▶ Closed (error)
//!        ┌──────────────────┐
//!        │   Processing     │ ← echo the body, or the default text
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← write, flush, shut down
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```
//!
//! Inside `Reading` the parser walks its own states: awaiting the
//! start-line, awaiting headers, then awaiting the body when a non-zero
//! `Content-Length` was announced.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sockhttp::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8888").await?;
//!     let name: Arc<str> = Arc::from("sockhttp");
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let name = name.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, name);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod error;
pub mod line;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
