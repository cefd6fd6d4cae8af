//! sockhttp - a minimal HTTP/1.1 server on raw stream sockets
//!
//! Core library for request framing, connection handling and dispatch.

pub mod config;
pub mod http;
pub mod server;
