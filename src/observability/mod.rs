//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) flows through the proxy via tower-http layers
//! - Metrics are cheap (atomic increments) and recorded per proxied request
//! - The Prometheus exporter is optional and runs on its own port

pub mod logging;
pub mod metrics;
