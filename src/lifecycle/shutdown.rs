//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

/// Coordinator for process shutdown.
///
/// Wraps a broadcast channel: the signal task triggers it, the server (and
/// tests) subscribe to it. Receivers created before the trigger observe it
/// exactly once.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
