//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use health_gate::lifecycle::Cancellation;
use health_gate::service::{self, ServiceMode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a programmable mock backend. `f` receives the 1-based request
/// number and returns the status and body to send.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let counter = Arc::new(AtomicU32::new(0));

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    tokio::spawn(async move {
                        let mut buf = [0u8; 2048];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f(n).await;
                        let status_text = match status {
                            200 => "200 OK",
                            204 => "204 No Content",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Backend answering with `statuses` in order, then repeating the last one.
/// Returns the address and a counter of requests served.
pub async fn start_sequence_backend(statuses: Vec<u16>) -> (SocketAddr, Arc<AtomicU32>) {
    let hits = Arc::new(AtomicU32::new(0));
    let seen = hits.clone();
    let statuses = Arc::new(statuses);

    let addr = start_programmable_backend(move |n| {
        let statuses = statuses.clone();
        seen.fetch_add(1, Ordering::SeqCst);
        async move {
            let idx = (n as usize - 1).min(statuses.len() - 1);
            (statuses[idx], "sequence".to_string())
        }
    })
    .await;

    (addr, hits)
}

/// Accepts connections but never answers, holding each open.
pub async fn start_black_hole() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address with nothing listening on it.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Run the demo service on an ephemeral port. Cancel the returned handle to stop it.
pub async fn start_demo_service(mode: ServiceMode) -> (SocketAddr, Cancellation) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Cancellation::new();
    let signal = shutdown.signal();

    tokio::spawn(async move {
        let _ = service::serve(listener, mode, signal).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    (addr, shutdown)
}
