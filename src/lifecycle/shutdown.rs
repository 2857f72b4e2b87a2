//! Stop signal shared by the listener and everything that waits on it.
//!
//! Two places drain on a trigger: `HttpServer::run`, which stops
//! accepting and lets in-flight dispatches finish, and the ephemeral
//! server the integration tests start. Routes and representers are
//! immutable once serving starts, so nothing else needs to be told.

use tokio::sync::broadcast;

/// Cloneable handle; every clone triggers the same channel.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver to hand to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every listener to drain. Returns how many were listening.
    ///
    /// Triggering with no listener left is not an error; the server may
    /// already have stopped on its own.
    pub fn trigger(&self) -> usize {
        let reached = self.tx.send(()).unwrap_or(0);
        tracing::debug!(listeners = reached, "Shutdown triggered");
        reached
    }

    /// Receivers not yet dropped.
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
