use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::http::connection::Connection;
use crate::server::queue::{PendingConnection, QueueReceiver};

/// A fixed set of workers pulling connections from a shared queue.
///
/// Workers run until the queue is closed (every sender dropped) and
/// drained.
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn spawn<S>(size: usize, queue: QueueReceiver<S>, server_name: Arc<str>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let workers = (1..=size.max(1))
            .map(|id| {
                let queue = queue.clone();
                let server_name = server_name.clone();
                tokio::spawn(worker_loop(id, queue, server_name))
            })
            .collect();

        Self { workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Waits for every worker to exit.
    pub async fn join(self) {
        for worker in self.workers {
            if let Err(e) = worker.await {
                error!(error = %e, "Worker terminated abnormally");
            }
        }
    }
}

async fn worker_loop<S>(id: usize, queue: QueueReceiver<S>, server_name: Arc<str>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let name = format!("worker-{}", id);
    info!(worker = %name, "Worker started");

    while let Some(conn) = queue.pop().await {
        serve(conn, server_name.clone(), &name).await;
    }

    info!(worker = %name, "Worker stopped");
}

/// Handles one connection on its own task and reports the outcome.
///
/// The stream is owned by that task and dropped when it ends, so the
/// connection is closed whether the handler returned, failed or panicked.
pub async fn serve<S>(conn: PendingConnection<S>, server_name: Arc<str>, worker: &str)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let PendingConnection { stream, peer } = conn;

    let task = tokio::spawn(async move {
        let mut conn = Connection::new(stream, server_name);
        conn.run().await
    });

    match task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(worker = %worker, peer = %peer, error = %e, "Connection error");
        }
        Err(e) => {
            error!(worker = %worker, peer = %peer, error = %e, "Connection handler panicked");
        }
    }
}
