//! Accepting connections and handing them to workers.
//!
//! - **`listener`**: the accept loop, with rebind on failure
//! - **`queue`**: the pending-connection queue shared with the workers
//! - **`pool`**: the fixed set of workers draining that queue

pub mod listener;
pub mod pool;
pub mod queue;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::info;

use crate::config::{DispatchMode, ServerConfig};
use listener::{Dispatch, Listener};
use pool::WorkerPool;
use queue::pending_queue;

/// Stops a running [`Server`]'s accept loop.
#[derive(Clone)]
pub struct ShutdownHandle {
    alive: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.alive.send_replace(false);
    }

    pub fn is_alive(&self) -> bool {
        *self.alive.borrow()
    }
}

/// A bound listener plus, in pool mode, its running workers.
pub struct Server {
    listener: Listener,
    dispatch: Dispatch,
    pool: Option<WorkerPool>,
    handle: ShutdownHandle,
}

impl Server {
    /// Binds the listening socket and starts the workers.
    pub async fn bind(cfg: &ServerConfig) -> anyhow::Result<Self> {
        let addr = resolve(&cfg.listen_addr).await?;
        let (alive_tx, alive_rx) = watch::channel(true);
        let listener = Listener::bind(addr, cfg.backlog, alive_rx)
            .with_context(|| format!("Failed to bind {}", addr))?;

        let server_name: Arc<str> = Arc::from(cfg.server_name.as_str());
        let (dispatch, pool) = match cfg.dispatch {
            DispatchMode::Pool => {
                let (tx, rx) = pending_queue();
                let pool = WorkerPool::spawn(cfg.workers, rx, server_name);
                info!(workers = pool.len(), "Worker pool started");
                (Dispatch::Pool(tx), Some(pool))
            }
            DispatchMode::Inline => (Dispatch::Inline(server_name), None),
        };

        Ok(Self {
            listener,
            dispatch,
            pool,
            handle: ShutdownHandle {
                alive: Arc::new(alive_tx),
            },
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.handle.clone()
    }

    /// Accepts until shut down, then lets the workers drain the queue.
    pub async fn run(self) -> anyhow::Result<()> {
        let Server {
            listener,
            dispatch,
            pool,
            handle: _handle,
        } = self;

        // Dropping the dispatch at the end closes the queue.
        listener.run(dispatch).await?;

        if let Some(pool) = pool {
            pool.join().await;
        }

        Ok(())
    }
}

async fn resolve(addr: &str) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host(addr)
        .await
        .with_context(|| format!("Invalid listen address {}", addr))?
        .next()
        .with_context(|| format!("No address found for {}", addr))
}
