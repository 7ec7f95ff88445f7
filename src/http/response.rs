//! Uniform client-facing JSON responses.
//!
//! Every upstream fault collapses to the same generic body; no upstream
//! error internals cross the trust boundary to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Generic response for any upstream failure (refused, reset, timed out).
pub fn service_unavailable() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Service temporarily unavailable" })),
    )
        .into_response()
}

/// Response for a path that matches no configured prefix. Lists the valid
/// mounts so the client can correct itself.
pub fn not_found(available_services: Vec<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "available_services": available_services,
            "help": "GET /services for the service descriptor",
        })),
    )
        .into_response()
}
