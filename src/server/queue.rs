//! Hand-off between the accept loop and the workers.
//!
//! An unbounded channel whose receiving end is shared: any number of
//! workers can wait on [`QueueReceiver::pop`], and each queued connection
//! goes to exactly one of them.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

/// An accepted connection waiting for a worker.
#[derive(Debug)]
pub struct PendingConnection<S> {
    pub stream: S,
    pub peer: String,
}

impl<S> PendingConnection<S> {
    pub fn new(stream: S, peer: impl ToString) -> Self {
        Self {
            stream,
            peer: peer.to_string(),
        }
    }
}

pub fn pending_queue<S>() -> (QueueSender<S>, QueueReceiver<S>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        QueueSender { tx },
        QueueReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

#[derive(Debug)]
pub struct QueueSender<S> {
    tx: mpsc::UnboundedSender<PendingConnection<S>>,
}

impl<S> Clone for QueueSender<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S> QueueSender<S> {
    /// Queues a connection. Hands it back if every receiver is gone.
    pub fn push(&self, conn: PendingConnection<S>) -> Result<(), PendingConnection<S>> {
        self.tx.send(conn).map_err(|e| e.0)
    }
}

#[derive(Debug)]
pub struct QueueReceiver<S> {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<PendingConnection<S>>>>,
}

impl<S> Clone for QueueReceiver<S> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<S> QueueReceiver<S> {
    /// Waits for the next connection.
    ///
    /// Returns `None` once every sender is dropped and the queue is empty.
    pub async fn pop(&self) -> Option<PendingConnection<S>> {
        self.rx.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drains_before_reporting_closed() {
        let (tx, rx) = pending_queue::<u32>();
        tx.push(PendingConnection::new(1, "a")).unwrap();
        tx.push(PendingConnection::new(2, "b")).unwrap();
        drop(tx);

        let other = rx.clone();
        assert_eq!(rx.pop().await.map(|c| c.stream), Some(1));
        assert_eq!(other.pop().await.map(|c| c.stream), Some(2));
        assert!(rx.pop().await.is_none());
    }

    #[tokio::test]
    async fn push_fails_without_receivers() {
        let (tx, rx) = pending_queue::<u32>();
        drop(rx);

        let rejected = tx.push(PendingConnection::new(7, "peer")).unwrap_err();
        assert_eq!(rejected.stream, 7);
        assert_eq!(rejected.peer, "peer");
    }
}
