//! Graceful shutdown for the HTTP server.
//!
//! `main` (or a test harness) owns the `Shutdown` handle and the server
//! holds a `ShutdownSignal`. The flag is sticky: a signal taken after the
//! trigger still resolves, so a Ctrl+C during startup is not lost.

use tokio::sync::watch;

/// Owner side of the shutdown flag.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Signal handed to the server.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask the server to stop accepting connections and drain.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Server side of the shutdown flag.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once shutdown is triggered or the `Shutdown` handle is dropped.
    pub async fn recv(mut self) {
        // Err means the owner is gone, which also ends the server.
        let _ = self.rx.wait_for(|stopping| *stopping).await;
    }
}
