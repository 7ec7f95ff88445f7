//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request path
//!     → table.rs (prefix scan, deterministic config order)
//!     → Return: matched Route + prefix-stripped suffix, or NoMatch
//!
//! Table Construction (at startup):
//!     ServiceConfig[]
//!     → one Route per service (name, prefix, target)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Table built at startup, immutable at runtime (thread-safe without locks)
//! - Literal prefix matching only, no regex in the hot path
//! - Deterministic: first match in configuration order wins
//! - Explicit no-match rather than a silent default upstream

pub mod table;

pub use table::{Route, RouteTable};
