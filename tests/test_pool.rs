use std::sync::Arc;
use std::time::Duration;

use sockhttp::server::pool::WorkerPool;
use sockhttp::server::queue::{pending_queue, PendingConnection};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

async fn send(mut client: DuplexStream, request: Vec<u8>) -> Vec<u8> {
    client.write_all(&request).await.unwrap();
    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    received
}

fn post(body: &str) -> Vec<u8> {
    format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}", body.len(), body).into_bytes()
}

#[tokio::test]
async fn test_pool_drains_more_connections_than_workers() {
    const WORKERS: usize = 3;
    const CONNECTIONS: usize = 25;

    let (tx, rx) = pending_queue();
    let pool = WorkerPool::spawn(WORKERS, rx, Arc::from("pool-test"));
    assert_eq!(pool.len(), WORKERS);

    let mut clients = Vec::new();
    for i in 0..CONNECTIONS {
        let (client, server) = tokio::io::duplex(256);
        assert!(tx.push(PendingConnection::new(server, format!("client-{}", i))).is_ok());
        clients.push(tokio::spawn(send(client, post(&format!("request-{}", i)))));
    }

    for (i, client) in clients.into_iter().enumerate() {
        let received = tokio::time::timeout(Duration::from_secs(10), client)
            .await
            .expect("connection was not served")
            .unwrap();
        let text = String::from_utf8(received).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains(&format!("\r\n\r\nrequest-{}\r\n", i)));
    }

    drop(tx);
    tokio::time::timeout(Duration::from_secs(5), pool.join())
        .await
        .expect("workers exit once the queue is closed");
}

#[tokio::test]
async fn test_failed_connection_does_not_stop_worker() {
    let (tx, rx) = pending_queue();
    let pool = WorkerPool::spawn(1, rx, Arc::from("pool-test"));

    let (bad_client, bad_server) = tokio::io::duplex(256);
    let (good_client, good_server) = tokio::io::duplex(256);
    assert!(tx.push(PendingConnection::new(bad_server, "bad")).is_ok());
    assert!(tx.push(PendingConnection::new(good_server, "good")).is_ok());

    let bad = send(bad_client, b"NOT A REQUEST\r\n\r\n".to_vec()).await;
    assert!(bad.is_empty());

    let good = send(good_client, post("still alive")).await;
    assert!(String::from_utf8(good).unwrap().contains("still alive\r\n"));

    drop(tx);
    pool.join().await;
}

#[tokio::test]
async fn test_hung_client_stalls_only_its_worker() {
    let (tx, rx) = pending_queue();
    let pool = WorkerPool::spawn(2, rx, Arc::from("pool-test"));

    // Never sends anything, so one worker waits on it.
    let (hung_client, hung_server) = tokio::io::duplex(256);
    assert!(tx.push(PendingConnection::new(hung_server, "hung")).is_ok());

    for i in 0..5 {
        let (client, server) = tokio::io::duplex(256);
        assert!(tx.push(PendingConnection::new(server, format!("client-{}", i))).is_ok());
        let received = tokio::time::timeout(Duration::from_secs(5), send(client, post("ok")))
            .await
            .expect("other workers keep serving");
        assert!(!received.is_empty());
    }

    drop(hung_client);
    drop(tx);
    pool.join().await;
}
