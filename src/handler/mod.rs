//! Request handler module
//!
//! Routing (the SPA path rewrite and method gate) and static file serving.

pub mod router;
pub mod static_files;

pub use router::handle_request;
