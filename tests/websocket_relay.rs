//! WebSocket relay behavior.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use mcp_gateway::config::GatewayConfig;
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

mod common;

#[tokio::test]
async fn text_frames_relayed_bidirectionally() {
    let upstream_addr: SocketAddr = "127.0.0.1:28301".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28302".parse().unwrap();

    common::start_ws_echo_upstream(upstream_addr).await;

    let mut config = GatewayConfig::default();
    common::set_target(&mut config, "notion", &format!("http://{upstream_addr}"));
    let shutdown = common::spawn_gateway(config, gateway_addr).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{gateway_addr}/notion/stream"))
        .await
        .expect("WebSocket upgrade through gateway failed");

    ws.send(Message::Text("hello-mcp".into())).await.unwrap();
    let echoed = ws.next().await.unwrap().unwrap();
    assert_eq!(echoed, Message::Text("hello-mcp".into()));

    ws.send(Message::Binary(vec![1u8, 2, 3].into()))
        .await
        .unwrap();
    let echoed = ws.next().await.unwrap().unwrap();
    assert_eq!(echoed, Message::Binary(vec![1u8, 2, 3].into()));

    ws.close(None).await.unwrap();

    shutdown.trigger();
}

#[tokio::test]
async fn client_close_tears_down_relay() {
    let upstream_addr: SocketAddr = "127.0.0.1:28303".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28304".parse().unwrap();

    common::start_ws_echo_upstream(upstream_addr).await;

    let mut config = GatewayConfig::default();
    common::set_target(&mut config, "github", &format!("http://{upstream_addr}"));
    let shutdown = common::spawn_gateway(config, gateway_addr).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{gateway_addr}/github/events"))
        .await
        .expect("WebSocket upgrade through gateway failed");

    ws.send(Message::Text("ping".into())).await.unwrap();
    assert_eq!(
        ws.next().await.unwrap().unwrap(),
        Message::Text("ping".into())
    );

    // Closing the client side must end the stream; the relay propagates the
    // close upstream rather than hanging.
    ws.close(None).await.unwrap();
    loop {
        match ws.next().await {
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(_)) => break,
        }
    }

    shutdown.trigger();
}

#[tokio::test]
async fn upgrade_to_dead_upstream_gets_generic_500() {
    let gateway_addr: SocketAddr = "127.0.0.1:28305".parse().unwrap();

    // Nothing listens on the filesystem target port.
    let mut config = GatewayConfig::default();
    common::set_target(&mut config, "filesystem", "http://127.0.0.1:28309");
    let shutdown = common::spawn_gateway(config, gateway_addr).await;

    // A plain reqwest GET with upgrade headers exposes the HTTP error body.
    let client = common::http_client();
    let res = client
        .get(format!("http://{gateway_addr}/filesystem/stream"))
        .header("connection", "upgrade")
        .header("upgrade", "websocket")
        .header("sec-websocket-version", "13")
        .header("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Service temporarily unavailable" }));

    shutdown.trigger();
}
