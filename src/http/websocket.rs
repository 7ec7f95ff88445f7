//! WebSocket proxy handling.
//!
//! # Responsibilities
//! - Dial the upstream before completing the client handshake, so a dead
//!   upstream still gets the generic 500 instead of a broken upgrade
//! - Bidirectional frame forwarding (text, binary, ping, pong, close)
//! - Close propagation in both directions: either side closing tears down
//!   the other
//!
//! # Data Flow
//! ```text
//! Client ←── WebSocket frames ──→ Gateway ←── WebSocket frames ──→ Upstream
//! ```

use std::time::{Duration, Instant};

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame as UpstreamCloseFrame;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;
use uuid::Uuid;

use crate::http::response;
use crate::observability::metrics;
use crate::routing::Route;

/// Handle a WebSocket upgrade on a matched route.
///
/// The upstream connection is established first; only on success is the
/// client upgrade completed and the relay started. A dead upstream gets the
/// same generic 500 as a failed HTTP forward.
pub async fn proxy_upgrade(
    parts: &mut Parts,
    route: &Route,
    suffix: &str,
    query: Option<&str>,
    connect_timeout: Duration,
    start: Instant,
) -> Response {
    let upstream_url = match upstream_ws_url(&route.target, suffix, query) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(service = %route.service, target = %route.target, error = %e, "WebSocket URL rewrite failed");
            metrics::record_request("WS", 500, &route.service, start);
            return response::service_unavailable();
        }
    };

    match tokio::time::timeout(connect_timeout, connect_async(upstream_url.as_str())).await {
        Ok(Ok((upstream, _handshake))) => {
            let ws = match WebSocketUpgrade::from_request_parts(parts, &()).await {
                Ok(ws) => ws,
                Err(rejection) => {
                    tracing::warn!(service = %route.service, "Malformed WebSocket upgrade request");
                    return rejection.into_response();
                }
            };

            let conn_id = Uuid::new_v4();
            tracing::info!(
                conn_id = %conn_id,
                service = %route.service,
                upstream = %upstream_url,
                "WebSocket relay established"
            );
            metrics::record_ws_connection(&route.service);
            ws.on_upgrade(move |client| relay(client, upstream, conn_id))
        }
        Ok(Err(e)) => {
            tracing::error!(
                service = %route.service,
                target = %route.target,
                error = %e,
                "WebSocket upstream connection failed"
            );
            metrics::record_request("WS", 500, &route.service, start);
            response::service_unavailable()
        }
        Err(_) => {
            tracing::error!(
                service = %route.service,
                target = %route.target,
                timeout_secs = connect_timeout.as_secs(),
                "WebSocket upstream connection timed out"
            );
            metrics::record_request("WS", 500, &route.service, start);
            response::service_unavailable()
        }
    }
}

/// Forward frames in both directions until either side closes or errors.
async fn relay(
    client: WebSocket,
    upstream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    conn_id: Uuid,
) {
    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    loop {
        tokio::select! {
            msg = client_rx.next() => match msg {
                Some(Ok(msg)) => {
                    let closing = matches!(msg, Message::Close(_));
                    if let Some(forwarded) = client_to_upstream(msg) {
                        if upstream_tx.send(forwarded).await.is_err() {
                            break;
                        }
                    }
                    if closing {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Client WebSocket error");
                    let _ = upstream_tx.send(UpstreamMessage::Close(None)).await;
                    break;
                }
                None => {
                    let _ = upstream_tx.send(UpstreamMessage::Close(None)).await;
                    break;
                }
            },
            msg = upstream_rx.next() => match msg {
                Some(Ok(msg)) => {
                    let closing = matches!(msg, UpstreamMessage::Close(_));
                    if let Some(forwarded) = upstream_to_client(msg) {
                        if client_tx.send(forwarded).await.is_err() {
                            break;
                        }
                    }
                    if closing {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Upstream WebSocket error");
                    let _ = client_tx.send(Message::Close(None)).await;
                    break;
                }
                None => {
                    let _ = client_tx.send(Message::Close(None)).await;
                    break;
                }
            },
        }
    }

    tracing::debug!(conn_id = %conn_id, "WebSocket relay closed");
}

/// Derive the upstream WebSocket URL from the HTTP target: same authority,
/// prefix-stripped path, query preserved, scheme mapped to ws/wss.
fn upstream_ws_url(target: &Url, suffix: &str, query: Option<&str>) -> Result<Url, url::ParseError> {
    let base = target.as_str().trim_end_matches('/');
    let rewritten = match query {
        Some(q) => format!("{base}{suffix}?{q}"),
        None => format!("{base}{suffix}"),
    };
    let mut url = Url::parse(&rewritten)?;
    let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
    // http ↔ ws are both "special" schemes, so this cannot fail.
    let _ = url.set_scheme(scheme);
    Ok(url)
}

fn client_to_upstream(msg: Message) -> Option<UpstreamMessage> {
    match msg {
        Message::Text(text) => Some(UpstreamMessage::Text(text.as_str().into())),
        Message::Binary(data) => Some(UpstreamMessage::Binary(data)),
        Message::Ping(data) => Some(UpstreamMessage::Ping(data)),
        Message::Pong(data) => Some(UpstreamMessage::Pong(data)),
        Message::Close(frame) => Some(UpstreamMessage::Close(frame.map(|f| UpstreamCloseFrame {
            code: CloseCode::from(f.code),
            reason: f.reason.as_str().into(),
        }))),
    }
}

fn upstream_to_client(msg: UpstreamMessage) -> Option<Message> {
    match msg {
        UpstreamMessage::Text(text) => Some(Message::Text(text.as_str().into())),
        UpstreamMessage::Binary(data) => Some(Message::Binary(data)),
        UpstreamMessage::Ping(data) => Some(Message::Ping(data)),
        UpstreamMessage::Pong(data) => Some(Message::Pong(data)),
        UpstreamMessage::Close(frame) => Some(Message::Close(frame.map(|f| CloseFrame {
            code: f.code.into(),
            reason: f.reason.as_str().into(),
        }))),
        // Raw frames only appear when the stream is configured for them.
        UpstreamMessage::Frame(_) => None,
    }
}
