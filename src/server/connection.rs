//! Connection handling
//!
//! Each accepted TCP connection is served on its own task. Requests never
//! share mutable state, so no coordination beyond the shared read-only
//! configuration is needed.

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::handler;
use crate::logger;

/// Serve one connection in a spawned task.
///
/// Connection-level errors (client reset, malformed request line) are
/// logged and dropped; they must never take the server down.
pub fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, cfg: Arc<Config>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            let cfg = Arc::clone(&cfg);
            async move { handler::handle_request(req, cfg, peer_addr).await }
        });

        let conn = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service);

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
