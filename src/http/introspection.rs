//! Built-in introspection endpoints.
//!
//! `/health` reports process liveness and the configured upstream targets
//! without probing them; `/services` is the static service descriptor.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub services: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct ServicesResponse {
    pub services: Vec<ServiceDescriptor>,
}

#[derive(Serialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub url: String,
    pub description: String,
}

/// `GET /health`. Always succeeds while the process is alive; upstream
/// state is deliberately not consulted.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let services = state
        .config
        .services
        .iter()
        .map(|s| (s.name.clone(), s.display_target()))
        .collect();

    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        services,
    })
}

/// `GET /services`. Stable descriptor of the configured fleet, in
/// configuration order; `url` is the gateway-relative mount path.
pub async fn services(State(state): State<AppState>) -> Json<ServicesResponse> {
    let services = state
        .config
        .services
        .iter()
        .map(|s| ServiceDescriptor {
            name: s.name.clone(),
            url: s.prefix.clone(),
            description: s.description.clone(),
        })
        .collect();

    Json(ServicesResponse { services })
}
