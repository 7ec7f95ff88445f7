//! MCP fleet gateway library.
//!
//! A reverse proxy that fronts a fixed fleet of Model-Context-Protocol
//! servers. Requests are dispatched by path prefix, the prefix is stripped
//! before forwarding, and WebSocket upgrades are relayed bidirectionally.
//! The gateway itself only answers `/health` and `/services`.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
