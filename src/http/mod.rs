//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound connection
//!     → server.rs (Axum setup, middleware, proxy dispatch)
//!     → introspection.rs (/health, /services answered locally)
//!     → websocket.rs (upgrade requests relayed to the upstream)
//!     → response.rs (uniform client-facing JSON errors)
//! ```

pub mod introspection;
pub mod response;
pub mod server;
pub mod websocket;

pub use server::{AppState, HttpServer};
