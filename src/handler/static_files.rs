//! Static file serving
//!
//! Resolves request paths under the configured site root and builds file
//! responses. Canonicalization keeps every served path inside the root;
//! a `..` escape gets 403, everything else missing gets 404.

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::range::RangeOutcome;
use crate::http::{cache, mime, range, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of mapping a request path onto the filesystem
#[derive(Debug)]
pub enum Resolved {
    /// Canonical path of a readable file inside the root
    File(PathBuf),
    /// Path escapes the site root
    Outside,
    NotFound,
}

/// Serve the (already rewritten) request path from the site root
pub async fn serve(ctx: &RequestContext<'_>, site: &SiteConfig) -> Response<Full<Bytes>> {
    match resolve_path(Path::new(&site.root), ctx.path, &site.index_files) {
        Resolved::File(path) => match fs::read(&path).await {
            Ok(content) => {
                let content_type =
                    mime::content_type_for(path.extension().and_then(|e| e.to_str()));
                build_file_response(&content, content_type, ctx)
            }
            // Resolved but unreadable (permissions, deleted between
            // stat and read): report it, answer 404, keep running
            Err(e) => {
                logger::log_error(&format!("Failed to read '{}': {e}", path.display()));
                response::not_found_response()
            }
        },
        Resolved::Outside => response::forbidden_response(),
        Resolved::NotFound => response::not_found_response(),
    }
}

/// Map a request path to a file under `root`.
///
/// Directory targets (and `/`, and trailing-slash paths) try the
/// configured index files in order. The canonicalized result must stay
/// inside the canonicalized root.
pub fn resolve_path(root: &Path, request_path: &str, index_files: &[String]) -> Resolved {
    let Ok(root_canonical) = root.canonicalize() else {
        logger::log_warning(&format!(
            "Site root '{}' not found or inaccessible",
            root.display()
        ));
        return Resolved::NotFound;
    };

    let relative = request_path.trim_start_matches('/');
    let mut target = root.join(relative);

    if relative.is_empty() || request_path.ends_with('/') || target.is_dir() {
        let Some(index) = index_files
            .iter()
            .map(|name| target.join(name))
            .find(|candidate| candidate.is_file())
        else {
            return Resolved::NotFound;
        };
        target = index;
    }

    // Missing files fail canonicalization; that is the common 404 case
    let Ok(target_canonical) = target.canonicalize() else {
        return Resolved::NotFound;
    };

    if !target_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!("Path traversal blocked: {request_path}"));
        return Resolved::Outside;
    }

    if !target_canonical.is_file() {
        return Resolved::NotFound;
    }

    Resolved::File(target_canonical)
}

/// Build the response for loaded file content: 304 if the client's copy
/// is current, 206 for a satisfiable range, 200 otherwise.
fn build_file_response(
    content: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::etag_for(content);

    if cache::none_match(ctx.if_none_match.as_deref(), &etag) {
        return response::not_modified_response(&etag);
    }

    match range::resolve(ctx.range_header.as_deref(), content.len()) {
        RangeOutcome::Partial { start, end } => response::partial_response(
            Bytes::copy_from_slice(&content[start..=end]),
            content_type,
            &etag,
            start,
            end,
            content.len(),
            ctx.is_head,
        ),
        RangeOutcome::Unsatisfiable => response::range_not_satisfiable_response(content.len()),
        RangeOutcome::Full => response::file_response(
            Bytes::copy_from_slice(content),
            content_type,
            &etag,
            ctx.is_head,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::router::rewrite_spa_path;
    use http_body_util::BodyExt;

    const SHELL: &str = "<h1>Shell</h1>";

    /// Site root with the SPA shell and a stylesheet, plus a secret file
    /// one level above the root for traversal tests.
    fn test_site() -> (tempfile::TempDir, SiteConfig) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("index.html"), SHELL).unwrap();
        std::fs::write(root.join("style.css"), "body { margin: 0 }").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

        let site = SiteConfig {
            root: root.to_str().unwrap().to_string(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        };
        (dir, site)
    }

    fn get(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_slug_serves_shell() {
        let (_dir, site) = test_site();
        let resp = serve(&get(rewrite_spa_path("/index/cars")), &site).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, SHELL);
    }

    #[tokio::test]
    async fn test_bare_prefix_serves_shell() {
        let (_dir, site) = test_site();
        let resp = serve(&get(rewrite_spa_path("/index/")), &site).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, SHELL);
    }

    #[tokio::test]
    async fn test_index_without_slash_is_literal_lookup() {
        let (_dir, site) = test_site();
        let resp = serve(&get(rewrite_spa_path("/index")), &site).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_all_slugs_serve_identical_bytes() {
        let (_dir, site) = test_site();
        let direct = serve(&get("/index.html"), &site).await;
        let direct_body = body_string(direct).await;
        for path in ["/index/a", "/index/b/c", "/index/a?x=1-ish-slug"] {
            let resp = serve(&get(rewrite_spa_path(path)), &site).await;
            assert_eq!(body_string(resp).await, direct_body);
        }
    }

    #[tokio::test]
    async fn test_css_served_with_content_type() {
        let (_dir, site) = test_site();
        let resp = serve(&get("/style.css"), &site).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/css");
        assert_eq!(body_string(resp).await, "body { margin: 0 }");
    }

    #[tokio::test]
    async fn test_root_resolves_index_file() {
        let (_dir, site) = test_site();
        let resp = serve(&get("/"), &site).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_string(resp).await, SHELL);
    }

    #[tokio::test]
    async fn test_traversal_never_serves_outside_root() {
        let (_dir, site) = test_site();
        for path in ["/../secret.txt", "/../../secret.txt", "/sub/../../secret.txt"] {
            let resp = serve(&get(path), &site).await;
            assert_ne!(resp.status(), 200, "{path} must not be served");
        }
    }

    #[tokio::test]
    async fn test_missing_file_404() {
        let (_dir, site) = test_site();
        let resp = serve(&get("/nope.html"), &site).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_idempotent() {
        let (_dir, site) = test_site();
        let first = body_string(serve(&get("/style.css"), &site).await).await;
        let second = body_string(serve(&get("/style.css"), &site).await).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_head_has_empty_body_and_length() {
        let (_dir, site) = test_site();
        let ctx = RequestContext {
            is_head: true,
            ..get("/index.html")
        };
        let resp = serve(&ctx, &site).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers()["Content-Length"],
            SHELL.len().to_string().as_str()
        );
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_conditional_get_304() {
        let (_dir, site) = test_site();
        let first = serve(&get("/index.html"), &site).await;
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let ctx = RequestContext {
            if_none_match: Some(etag.clone()),
            ..get("/index.html")
        };
        let resp = serve(&ctx, &site).await;
        assert_eq!(resp.status(), 304);
        assert_eq!(resp.headers()["ETag"].to_str().unwrap(), etag);
    }

    #[tokio::test]
    async fn test_range_request_206() {
        let (_dir, site) = test_site();
        let ctx = RequestContext {
            range_header: Some("bytes=0-3".to_string()),
            ..get("/index.html")
        };
        let resp = serve(&ctx, &site).await;
        assert_eq!(resp.status(), 206);
        assert_eq!(
            resp.headers()["Content-Range"],
            format!("bytes 0-3/{}", SHELL.len()).as_str()
        );
        assert_eq!(body_string(resp).await, "<h1>");
    }

    #[tokio::test]
    async fn test_range_past_end_416() {
        let (_dir, site) = test_site();
        let ctx = RequestContext {
            range_header: Some("bytes=9999-".to_string()),
            ..get("/index.html")
        };
        let resp = serve(&ctx, &site).await;
        assert_eq!(resp.status(), 416);
    }

    #[tokio::test]
    async fn test_missing_root_is_404_not_panic() {
        let site = SiteConfig {
            root: "/no/such/site/root".to_string(),
            index_files: vec!["index.html".to_string()],
        };
        let resp = serve(&get("/index.html"), &site).await;
        assert_eq!(resp.status(), 404);
    }
}
