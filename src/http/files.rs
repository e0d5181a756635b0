//! Static file serving.
//!
//! Files are resolved against the root directory with the full request
//! path, so a route at `/images/` rooted at `./public` serves
//! `./public/images/logo.png` for `/images/logo.png`.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::http::response;
use crate::routing::handler::Handler;
use crate::routing::path::canonicalize;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Handler serving files below `root`.
///
/// - `list_directories`: when off, any path ending in `/` is not found;
///   when on, a directory path serves its `index.html`, or an HTML listing
///   of its entries when it has none
/// - `prefer_gzip`: serve a precompressed `<file>.gz` to clients that
///   accept gzip
pub fn file_handler(root: PathBuf, list_directories: bool, prefer_gzip: bool) -> Handler {
    tracing::debug!(
        root = %root.display(),
        list_directories,
        prefer_gzip,
        "Static file handler created"
    );

    let mut serve_dir = ServeDir::new(&root).append_index_html_on_directories(list_directories);
    if prefer_gzip {
        serve_dir = serve_dir.precompressed_gzip();
    }

    Handler::from_fn(move |req: Request<Body>| {
        let serve_dir = serve_dir.clone();
        let root = root.clone();
        async move {
            let path = req.uri().path().to_string();
            if path.ends_with('/') {
                if !list_directories {
                    return response::not_found();
                }
                let dir = resolve(&root, &path);
                let has_index = tokio::fs::metadata(dir.join("index.html"))
                    .await
                    .is_ok_and(|meta| meta.is_file());
                let is_dir = tokio::fs::metadata(&dir).await.is_ok_and(|meta| meta.is_dir());
                if is_dir && !has_index {
                    return list_directory(&dir).await;
                }
            }
            match serve_dir.oneshot(req).await {
                Ok(res) => res.into_response(),
                Err(never) => match never {},
            }
        }
    })
}

/// `path` joined under `root`, never above it.
fn resolve(root: &Path, path: &str) -> PathBuf {
    let cleaned = canonicalize(path);
    let relative = cleaned.trim_start_matches('/');
    root.join(relative)
}

/// HTML list of the entries in `dir`, sorted by name. Directories get a
/// trailing `/`.
async fn list_directory(dir: &Path) -> Response {
    let mut reader = match tokio::fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "Failed to read directory");
            return response::plain_error(StatusCode::INTERNAL_SERVER_ERROR, "Error reading directory");
        }
    };

    let mut names = Vec::new();
    loop {
        match reader.next_entry().await {
            Ok(Some(entry)) => {
                let mut name = entry.file_name().to_string_lossy().into_owned();
                if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                    name.push('/');
                }
                names.push(name);
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "Failed to read directory");
                return response::plain_error(StatusCode::INTERNAL_SERVER_ERROR, "Error reading directory");
            }
        }
    }
    names.sort();

    let mut body = String::from("<pre>\n");
    for name in &names {
        let escaped = escape_html(name);
        body.push_str(&format!("<a href=\"{escaped}\">{escaped}</a>\n"));
    }
    body.push_str("</pre>\n");

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))],
        body,
    )
        .into_response()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use std::fs;

    async fn get(handler: &Handler, uri: &str, gzip: bool) -> axum::response::Response {
        let mut builder = Request::builder().uri(uri);
        if gzip {
            builder = builder.header(header::ACCEPT_ENCODING, "gzip");
        }
        handler.call(builder.body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn test_serves_by_full_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/a.txt"), "hello").unwrap();

        let handler = file_handler(dir.path().to_path_buf(), false, false);

        let res = get(&handler, "/images/a.txt", false).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hello");

        let res = get(&handler, "/images/missing.txt", false).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_directory_listing_switch() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();

        let closed = file_handler(dir.path().to_path_buf(), false, false);
        assert_eq!(get(&closed, "/docs/", false).await.status(), StatusCode::NOT_FOUND);

        let open = file_handler(dir.path().to_path_buf(), true, false);
        assert_eq!(get(&open, "/docs/", false).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_lists_directory_without_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs/guides")).unwrap();
        fs::write(dir.path().join("docs/b.txt"), "b").unwrap();
        fs::write(dir.path().join("docs/a<1>.txt"), "a").unwrap();

        let closed = file_handler(dir.path().to_path_buf(), false, false);
        assert_eq!(get(&closed, "/docs/", false).await.status(), StatusCode::NOT_FOUND);

        let open = file_handler(dir.path().to_path_buf(), true, false);
        let res = get(&open, "/docs/", false).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], HTML_CONTENT_TYPE);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "<pre>\n\
             <a href=\"a&lt;1&gt;.txt\">a&lt;1&gt;.txt</a>\n\
             <a href=\"b.txt\">b.txt</a>\n\
             <a href=\"guides/\">guides/</a>\n\
             </pre>\n"
        );

        // Missing directories are still not found.
        assert_eq!(get(&open, "/nothing/", false).await.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_resolve_stays_under_root() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve(root, "/docs/"), Path::new("/srv/public/docs/"));
        assert_eq!(resolve(root, "/../../etc/"), Path::new("/srv/public/etc/"));
    }

    #[tokio::test]
    async fn test_prefers_precompressed_gzip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.js"), "plain").unwrap();
        fs::write(dir.path().join("app.js.gz"), "gzipped").unwrap();

        let handler = file_handler(dir.path().to_path_buf(), false, true);

        let res = get(&handler, "/app.js", true).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_ENCODING], "gzip");

        let res = get(&handler, "/app.js", false).await;
        assert!(res.headers().get(header::CONTENT_ENCODING).is_none());
    }
}
