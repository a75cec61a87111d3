//! Request routing
//!
//! Entry point for each HTTP request: validates the method, applies the
//! SPA path rewrite, delegates to the static file handler, and writes the
//! access log line.
//!
//! The rewrite contract: any path starting with the literal `/index/`
//! serves `/index.html` instead. The remainder of the path (the slug) is
//! for client-side script only and is never inspected here.

use crate::config::Config;
use crate::handler::static_files;
use crate::http::response;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Literal prefix that triggers the rewrite. Case-sensitive, trailing
/// slash required: `/index` alone is an ordinary file lookup.
pub const SPA_PREFIX: &str = "/index/";

/// The single shell page every rewritten request resolves to
pub const SPA_SHELL: &str = "/index.html";

/// Request data the static file handler needs
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Apply the SPA rewrite rule to a request path.
///
/// The slug after the prefix is discarded, not parsed.
pub fn rewrite_spa_path(path: &str) -> &str {
    if path.starts_with(SPA_PREFIX) {
        SPA_SHELL
    } else {
        path
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    cfg: Arc<Config>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let is_head = method == Method::HEAD;

    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let response = match check_http_method(&method) {
        Some(resp) => resp,
        None => {
            let path = rewrite_spa_path(uri.path());
            let ctx = RequestContext {
                path,
                is_head,
                if_none_match: header("if-none-match"),
                range_header: header("range"),
            };
            static_files::serve(&ctx, &cfg.site).await
        }
    };

    if cfg.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.referer = header("referer");
        entry.user_agent = header("user-agent");
        logger::log_access(&entry, &cfg.logging.access_log_format);
    }

    Ok(response)
}

/// Gate on HTTP method: GET/HEAD proceed, OPTIONS gets 204, the rest 405
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(response::options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(response::method_not_allowed_response())
        }
    }
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
