//! Logger module
//!
//! Startup banner, per-request access logging, and error/warning output.
//! Access and info lines go to stdout, errors and warnings to stderr.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

/// Print the startup banner: the listening address and the clean-URL
/// pattern served by the SPA rewrite. Exactly two lines on stdout.
pub fn log_server_start(addr: &SocketAddr, root: &str) {
    println!("Serving '{root}' on http://{addr}");
    println!("Clean URLs: http://{addr}/index/<slug>");
}

pub fn log_shutdown() {
    println!("Shutting down");
}

/// Write one formatted access log line
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    println!("{}", entry.format(format));
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}
