//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Build route table → Bind listener → Serve
//!
//! Shutdown:
//!     SIGINT/SIGTERM (signals.rs)
//!     → Shutdown::trigger (shutdown.rs, broadcast)
//!     → accept loop stops, short bounded grace, process exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
