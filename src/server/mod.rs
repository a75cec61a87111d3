//! Server module
//!
//! Owns the listener, the accept loop, and shutdown signaling.

pub mod connection;
pub mod listener;
pub mod signal;

use std::sync::Arc;

use crate::config::Config;
use crate::logger;

/// Bind the listener and run the accept loop until a termination signal.
///
/// Bind failure is fatal and is reported before the startup banner would
/// have printed; per-connection failures only log.
pub async fn run(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    let tcp_listener = listener::bind(addr)
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    logger::log_server_start(&addr, &cfg.site.root);

    let signals = Arc::new(signal::SignalHandler::new());
    signal::start_signal_handler(Arc::clone(&signals));

    let cfg = Arc::new(cfg);

    loop {
        tokio::select! {
            accept_result = tcp_listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::handle_connection(stream, peer_addr, Arc::clone(&cfg));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                logger::log_shutdown();
                break;
            }
        }
    }

    Ok(())
}
