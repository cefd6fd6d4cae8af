use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::server::pool::serve;
use crate::server::queue::{PendingConnection, QueueSender};

/// Pause between attempts to rebind after the listening socket failed.
const REBIND_DELAY: Duration = Duration::from_millis(100);

/// Where accepted connections go.
pub enum Dispatch {
    /// Onto the queue drained by a [`WorkerPool`](crate::server::pool::WorkerPool).
    Pool(QueueSender<TcpStream>),
    /// Onto a freshly spawned task each.
    Inline(Arc<str>),
}

/// Owns the listening socket and the accept loop.
///
/// If accepting fails, the socket is dropped and a new one is bound on the
/// same endpoint; the loop only ends when the alive flag goes false.
pub struct Listener {
    addr: SocketAddr,
    backlog: u32,
    socket: Option<TcpListener>,
    alive: watch::Receiver<bool>,
}

impl Listener {
    pub fn bind(addr: SocketAddr, backlog: u32, alive: watch::Receiver<bool>) -> anyhow::Result<Self> {
        let socket = bind_socket(addr, backlog)?;
        // Keep the resolved port so a rebind lands on the same endpoint.
        let addr = socket.local_addr()?;
        info!("Listening on {}", addr);

        Ok(Self {
            addr,
            backlog,
            socket: Some(socket),
            alive,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(mut self, dispatch: Dispatch) -> anyhow::Result<()> {
        while self.is_alive() {
            let Some(socket) = self.socket.as_ref() else {
                self.rebind().await;
                continue;
            };

            let accepted = tokio::select! {
                res = socket.accept() => res,
                changed = self.alive.changed() => {
                    if changed.is_err() {
                        // Every shutdown handle is gone; nothing can stop us later.
                        warn!("Lifecycle handle dropped, stopping listener");
                        break;
                    }
                    continue;
                }
            };

            match accepted {
                Ok((stream, peer)) => {
                    info!("Accepted connection from {}", peer);
                    Self::dispatch(&dispatch, stream, peer);
                }
                Err(e) => {
                    error!(addr = %self.addr, error = %e, "Accept failed, rebinding");
                    self.socket = None;
                    self.rebind().await;
                }
            }
        }

        info!(addr = %self.addr, "Listener stopped");
        Ok(())
    }

    fn is_alive(&self) -> bool {
        *self.alive.borrow()
    }

    fn dispatch(dispatch: &Dispatch, stream: TcpStream, peer: SocketAddr) {
        let conn = PendingConnection::new(stream, peer);
        match dispatch {
            Dispatch::Pool(queue) => {
                if let Err(conn) = queue.push(conn) {
                    error!(peer = %conn.peer, "No workers left, dropping connection");
                }
            }
            Dispatch::Inline(server_name) => {
                let server_name = server_name.clone();
                tokio::spawn(async move {
                    serve(conn, server_name, "inline").await;
                });
            }
        }
    }

    async fn rebind(&mut self) {
        while self.is_alive() {
            match bind_socket(self.addr, self.backlog) {
                Ok(socket) => {
                    info!(addr = %self.addr, "Listening socket rebound");
                    self.socket = Some(socket);
                    return;
                }
                Err(e) => {
                    error!(addr = %self.addr, error = %e, "Rebind failed");
                    tokio::time::sleep(REBIND_DELAY).await;
                }
            }
        }
    }
}

fn bind_socket(addr: SocketAddr, backlog: u32) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}
