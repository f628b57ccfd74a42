// ABOUTME: Read-only static file server over any FileTree, used for assets and spec files.
// ABOUTME: Resolves directory index pages, redirects bare directories, and never lists contents.

use std::borrow::Cow;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use specgate_core::{Entry, FileTree, TreeError, normalize};
use tower::Service;

use crate::response::status_response;

const INDEX_FILE: &str = "index.html";

/// Serves files out of a single tree.
///
/// Paths handed to [`TreeServer::serve`] are relative to the tree root and
/// are re-normalized before lookup.
#[derive(Clone)]
pub struct TreeServer {
    tree: Arc<dyn FileTree>,
}

impl TreeServer {
    pub fn new(tree: Arc<dyn FileTree>) -> Self {
        Self { tree }
    }

    /// Serve `path` from the tree.
    ///
    /// An empty path or one ending in `/` serves that directory's
    /// `index.html`. A directory named without a trailing slash is
    /// redirected to the slashed form.
    pub async fn serve(&self, path: &str) -> Response {
        let wants_dir = path.is_empty() || path.ends_with('/');
        let clean = normalize(path);
        let rel = clean.trim_start_matches('/');

        if wants_dir {
            let index = if rel.is_empty() {
                INDEX_FILE.to_string()
            } else {
                format!("{rel}/{INDEX_FILE}")
            };
            return match self.tree.open(&index).await {
                Ok(Entry::File(contents)) => file_response(&index, contents),
                Ok(Entry::Dir) => status_response(StatusCode::NOT_FOUND),
                Err(err) => error_response(&index, err),
            };
        }

        match self.tree.open(rel).await {
            Ok(Entry::File(contents)) => file_response(rel, contents),
            Ok(Entry::Dir) => redirect_to_dir(rel),
            Err(err) => error_response(rel, err),
        }
    }
}

/// Standalone use as a service: the request path, minus its leading slash,
/// is the tree path. Only GET is accepted.
impl<B> Service<Request<B>> for TreeServer {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let server = self.clone();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        Box::pin(async move {
            if method != Method::GET {
                return Ok(status_response(StatusCode::METHOD_NOT_ALLOWED));
            }
            let Ok(decoded) = urlencoding::decode(&path) else {
                return Ok(status_response(StatusCode::NOT_FOUND));
            };
            Ok(server.serve(decoded.trim_start_matches('/')).await)
        })
    }
}

fn file_response(path: &str, contents: Cow<'static, [u8]>) -> Response {
    let len = contents.len();
    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type(path)),
            ),
            (header::CONTENT_LENGTH, HeaderValue::from(len)),
        ],
        Body::from(contents),
    )
        .into_response()
}

fn error_response(path: &str, err: TreeError) -> Response {
    if err.is_not_found() {
        tracing::debug!(path, "file not found in tree");
        return status_response(StatusCode::NOT_FOUND);
    }
    tracing::error!(path, error = %err, "failed to read file from tree");
    status_response(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Relative redirect from `dir` to `dir/`, the way static file servers do.
fn redirect_to_dir(rel: &str) -> Response {
    let name = rel.rsplit('/').next().unwrap_or(rel);
    let location = format!("{}/", urlencoding::encode(name));
    match HeaderValue::try_from(location) {
        Ok(location) => (
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, location)],
        )
            .into_response(),
        Err(_) => status_response(StatusCode::NOT_FOUND),
    }
}

/// Content type by file extension; unknown types are served as octet streams.
fn content_type(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "txt" | "md" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
