//! Signal handling
//!
//! SIGINT (Ctrl+C) and SIGTERM stop the accept loop; the process then
//! exits 0. In-flight connections are not drained, no request leaves
//! state behind that would need flushing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shutdown coordination between the signal task and the accept loop
pub struct SignalHandler {
    pub shutdown: Arc<Notify>,
    pub shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the background task that waits for termination signals (Unix)
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }

        handler.shutdown_requested.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so the accept loop sees the signal
        // even if it is not parked on notified() at this instant
        handler.shutdown.notify_one();
    });
}

/// Non-Unix fallback, Ctrl+C only
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            handler.shutdown_requested.store(true, Ordering::SeqCst);
            handler.shutdown.notify_one();
        }
    });
}
