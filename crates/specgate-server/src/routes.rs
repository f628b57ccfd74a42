// ABOUTME: Router builders that mount the gateway, or the bare asset tree, under a path prefix.
// ABOUTME: Adds the root and bare-prefix redirects to the mounted UI and tower-http request tracing.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::Router;
use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderValue, Request, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower::Service;
use tower_http::trace::TraceLayer;

use crate::assets::assets_service;
use crate::gateway::SpecGateway;
use crate::response::status_response;

/// Build the router serving `gateway` under `mount`.
///
/// `mount` is a normalized prefix such as `/swagger-ui` (see
/// [`crate::config::normalize_mount`]); the empty string serves the gateway
/// at the root. With a prefix, `/` and the bare prefix redirect to
/// `<mount>/` so the page's relative links resolve.
pub fn create_router(gateway: SpecGateway, mount: &str) -> Router {
    let router = if mount.is_empty() {
        Router::new().fallback_service(gateway)
    } else {
        let landing = format!("{mount}/");
        Router::new()
            .route("/", get(move || async move { redirect(StatusCode::FOUND, &landing) }))
            .fallback_service(Mounted::new(mount, gateway))
    };

    router.layer(TraceLayer::new_for_http())
}

/// Build the router for URL mode: only the bundled assets are served under
/// `mount`, and `/` redirects to the asset page configured with `spec_url`.
pub fn create_url_router(mount: &str, spec_url: &str) -> Router {
    let landing = format!("{mount}/?url={}", urlencoding::encode(spec_url));

    Router::new()
        .route("/", get(move || async move { redirect(StatusCode::FOUND, &landing) }))
        .fallback_service(Mounted::new(mount, assets_service()))
        .layer(TraceLayer::new_for_http())
}

/// Serves `inner` below `prefix`, with the prefix stripped from the request URI.
///
/// The bare prefix gets a 301 to `<prefix>/`; anything outside the prefix is 404.
#[derive(Clone)]
struct Mounted<S> {
    prefix: Arc<str>,
    inner: S,
}

impl<S> Mounted<S> {
    fn new(prefix: &str, inner: S) -> Self {
        Self {
            prefix: Arc::from(prefix),
            inner,
        }
    }
}

impl<S> Service<Request<Body>> for Mounted<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let path = req.uri().path();
        let query = req.uri().query();

        if path == &*self.prefix {
            let location = match query {
                Some(query) => format!("{}/?{query}", self.prefix),
                None => format!("{}/", self.prefix),
            };
            let resp = redirect(StatusCode::MOVED_PERMANENTLY, &location);
            return Box::pin(async move { Ok(resp) });
        }

        let Some(rest) = path
            .strip_prefix(&*self.prefix)
            .filter(|rest| rest.starts_with('/'))
        else {
            tracing::debug!(path, prefix = %self.prefix, "request outside the mount");
            return Box::pin(async move { Ok(status_response(StatusCode::NOT_FOUND)) });
        };

        let stripped = match query {
            Some(query) => format!("{rest}?{query}"),
            None => rest.to_string(),
        };
        let Some(req) = with_path_and_query(req, stripped) else {
            return Box::pin(async move { Ok(status_response(StatusCode::NOT_FOUND)) });
        };

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}

/// Replace the path and query of `req`, keeping scheme and authority.
fn with_path_and_query(req: Request<Body>, path_and_query: String) -> Option<Request<Body>> {
    let (mut parts, body) = req.into_parts();
    let mut uri = parts.uri.into_parts();
    uri.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    parts.uri = Uri::from_parts(uri).ok()?;
    Some(Request::from_parts(parts, body))
}

fn redirect(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(err) => {
            tracing::error!(error = %err, location, "invalid redirect location");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
