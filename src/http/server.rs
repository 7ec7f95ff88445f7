//! HTTP server setup and proxy dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with introspection routes and the proxy fallback
//! - Wire up middleware (request ID, tracing)
//! - Match the route table and strip the service prefix
//! - Forward method, headers, and body unchanged to the upstream
//! - Enforce the upstream timeout; convert every upstream fault to the
//!   generic 500 response
//! - Hand WebSocket upgrades to the relay

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::uri::InvalidUri;
use axum::http::{header, HeaderMap, Request, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::MakeRequestUuid;
use tower_http::trace::TraceLayer;
use tower_http::ServiceBuilderExt;
use url::Url;

use crate::config::GatewayConfig;
use crate::http::{introspection, response, websocket};
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Bounded drain after the shutdown signal; in-flight connections are
/// dropped once it elapses.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Application state injected into handlers. The route table and config are
/// immutable after startup, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub client: Client<HttpConnector, Body>,
    pub config: Arc<GatewayConfig>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let config = Arc::new(config);
        let table = Arc::new(RouteTable::from_config(&config.services));
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            table,
            client,
            config,
        };

        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(introspection::health))
            .route("/services", get(introspection::services))
            .fallback(proxy_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .set_x_request_id(MakeRequestUuid)
                    .layer(TraceLayer::new_for_http())
                    .propagate_x_request_id(),
            )
    }

    /// Run the server until the shutdown signal fires.
    ///
    /// On shutdown the accept loop stops immediately; in-flight connections
    /// (including WebSocket relays) get a short bounded grace period and are
    /// then dropped.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut grace = shutdown.resubscribe();
        let serve = axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Stopping accept loop");
            });

        tokio::select! {
            result = serve => result?,
            _ = async {
                let _ = grace.recv().await;
                tokio::time::sleep(SHUTDOWN_GRACE).await;
            } => {
                tracing::warn!("Grace period elapsed, dropping in-flight connections");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler: match the route table, strip the prefix, forward.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let Some((route, suffix)) = state.table.match_path(&path) else {
        tracing::warn!(method = %method, path = %path, "No service prefix matched");
        metrics::record_request(&method, 404, "none", start);
        return response::not_found(state.table.mount_paths());
    };

    tracing::debug!(
        method = %method,
        path = %path,
        service = %route.service,
        suffix = %suffix,
        "Proxying request"
    );

    if is_websocket_upgrade(request.headers()) {
        let query = request.uri().query().map(str::to_owned);
        let (mut parts, _body) = request.into_parts();
        return websocket::proxy_upgrade(
            &mut parts,
            route,
            suffix,
            query.as_deref(),
            Duration::from_secs(state.config.timeouts.connect_secs),
            start,
        )
        .await;
    }

    let service = route.service.clone();
    let target = route.target.clone();
    let uri = match upstream_uri(&target, suffix, request.uri().query()) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(service = %service, target = %target, error = %e, "Upstream URI rewrite failed");
            metrics::record_request(&method, 500, &service, start);
            return response::service_unavailable();
        }
    };

    let (parts, body) = request.into_parts();

    let mut builder = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .version(parts.version);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
    let upstream_request = match builder.body(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(service = %service, target = %target, error = %e, "Upstream request build failed");
            metrics::record_request(&method, 500, &service, start);
            return response::service_unavailable();
        }
    };

    let timeout = Duration::from_secs(state.config.timeouts.upstream_secs);
    match tokio::time::timeout(timeout, state.client.request(upstream_request)).await {
        Ok(Ok(upstream_response)) => {
            let status = upstream_response.status();
            metrics::record_request(&method, status.as_u16(), &service, start);

            let (parts, body) = upstream_response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(
                service = %service,
                target = %target,
                error = %e,
                "Upstream request failed"
            );
            metrics::record_request(&method, 500, &service, start);
            response::service_unavailable()
        }
        Err(_) => {
            tracing::error!(
                service = %service,
                target = %target,
                timeout_secs = timeout.as_secs(),
                "Upstream request timed out"
            );
            metrics::record_request(&method, 500, &service, start);
            response::service_unavailable()
        }
    }
}

/// True when the request asks for a WebSocket upgrade.
fn is_websocket_upgrade(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}

/// Rebuild the request URI against the upstream base, preserving the
/// prefix-stripped path and the original query string byte-for-byte.
fn upstream_uri(target: &Url, suffix: &str, query: Option<&str>) -> Result<Uri, InvalidUri> {
    let base = target.as_str().trim_end_matches('/');
    let rewritten = match query {
        Some(q) => format!("{base}{suffix}?{q}"),
        None => format!("{base}{suffix}"),
    };
    rewritten.parse()
}
