//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use url::Url;

use mcp_gateway::config::GatewayConfig;
use mcp_gateway::http::HttpServer;
use mcp_gateway::lifecycle::Shutdown;

/// Start a mock upstream that answers every request with 200 and a fixed body.
#[allow(dead_code)]
pub async fn start_mock_upstream(addr: SocketAddr, body: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock upstream that records the request target (path + query) of
/// every request it receives and answers 200.
#[allow(dead_code)]
pub async fn start_recording_upstream(addr: SocketAddr) -> mpsc::UnboundedReceiver<String> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        if let Some(target) = head
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                        {
                            let _ = tx.send(target.to_string());
                        }
                        let body = "upstream-ok";
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    rx
}

/// Start a mock upstream that sleeps before answering, to observe
/// serialization (or its absence) between routes.
#[allow(dead_code)]
pub async fn start_slow_upstream(addr: SocketAddr, delay: Duration, body: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        tokio::time::sleep(delay).await;
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock upstream that accepts connections but never responds.
#[allow(dead_code)]
pub async fn start_silent_upstream(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock WebSocket upstream that echoes text and binary frames.
#[allow(dead_code)]
pub async fn start_ws_echo_upstream(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut ws = match tokio_tungstenite::accept_async(stream).await {
                    Ok(ws) => ws,
                    Err(_) => return,
                };
                while let Some(Ok(msg)) = ws.next().await {
                    if msg.is_close() {
                        let _ = ws.close(None).await;
                        break;
                    }
                    if (msg.is_text() || msg.is_binary()) && ws.send(msg).await.is_err() {
                        break;
                    }
                }
            });
        }
    });
}

/// Point a configured service at a test upstream.
pub fn set_target(config: &mut GatewayConfig, service: &str, target: &str) {
    let entry = config
        .services
        .iter_mut()
        .find(|s| s.name == service)
        .unwrap_or_else(|| panic!("no service named {service}"));
    entry.target = Url::parse(target).unwrap();
}

/// Spawn the gateway on the given address and return its shutdown handle.
pub async fn spawn_gateway(mut config: GatewayConfig, addr: SocketAddr) -> Shutdown {
    config.listener.host = addr.ip().to_string();
    config.listener.port = addr.port();
    config.observability.metrics_enabled = false;

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    let server = HttpServer::new(config);
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, shutdown_rx).await;
    });

    // Give the accept loop a beat before tests fire requests.
    tokio::time::sleep(Duration::from_millis(100)).await;

    shutdown
}

/// A reqwest client that never reuses pooled connections between tests.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
