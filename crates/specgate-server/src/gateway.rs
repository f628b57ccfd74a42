// ABOUTME: The spec gateway: a tower service routing GET requests to the index, assets, or allowed specs.
// ABOUTME: Spec files are only reachable through exact membership in the closed-world access registry.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use specgate_core::{AccessRegistry, FileTree, SpecFile};
use thiserror::Error;
use tower::Service;

use crate::assets::bundled_assets;
use crate::file_server::TreeServer;
use crate::index::render_index;
use crate::response::status_response;

const ASSETS_ROUTE: &str = "/assets/";
const SPECS_ROUTE: &str = "/specs/";

/// Errors that can occur while constructing a gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no spec file tree was provided")]
    MissingSpecTree,
}

struct Inner {
    registry: AccessRegistry,
    assets: TreeServer,
    specs: TreeServer,
}

/// HTTP handler serving the Swagger UI, its assets, and the declared spec files.
///
/// Cloning is cheap; all clones share the same immutable state. When mounted
/// below a path prefix, strip the prefix first (axum's `nest_service` does).
#[derive(Clone)]
pub struct SpecGateway {
    inner: Arc<Inner>,
}

impl SpecGateway {
    /// Start building a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    /// Build a gateway over `spec_tree` that serves exactly the declared files.
    pub fn new<I>(files: I, spec_tree: Arc<dyn FileTree>) -> Self
    where
        I: IntoIterator<Item = SpecFile>,
    {
        let files: Vec<SpecFile> = files.into_iter().collect();
        let registry = AccessRegistry::build(&files);

        for entry in registry.entries() {
            tracing::info!(name = %entry.name, path = %entry.public_path, "registered spec file");
        }

        Self {
            inner: Arc::new(Inner {
                registry,
                assets: TreeServer::new(bundled_assets()),
                specs: TreeServer::new(spec_tree),
            }),
        }
    }

    /// The access registry built from the declared files.
    pub fn registry(&self) -> &AccessRegistry {
        &self.inner.registry
    }

    /// Route one request by method and raw (still percent-encoded) path.
    pub async fn route(&self, method: &Method, raw_path: &str) -> Response {
        if method != Method::GET {
            return status_response(StatusCode::METHOD_NOT_ALLOWED);
        }

        let Ok(decoded) = urlencoding::decode(raw_path) else {
            tracing::debug!(path = raw_path, "request path is not valid utf-8");
            return status_response(StatusCode::NOT_FOUND);
        };
        let mut path = decoded.into_owned();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        if path == "/" || path == "/index.html" {
            return render_index(self.inner.registry.entries());
        }

        if let Some(rest) = path.strip_prefix(ASSETS_ROUTE) {
            return self.inner.assets.serve(rest).await;
        }

        if self.inner.registry.contains(&path) {
            if let Some(rest) = path.strip_prefix(SPECS_ROUTE) {
                return self.inner.specs.serve(rest).await;
            }
        }

        tracing::debug!(path = %path, "no route for request");
        status_response(StatusCode::NOT_FOUND)
    }
}

impl<B> Service<Request<B>> for SpecGateway {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let gateway = self.clone();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        Box::pin(async move { Ok(gateway.route(&method, &path).await) })
    }
}

/// Builder for [`SpecGateway`]; the spec tree is required.
#[derive(Default)]
pub struct GatewayBuilder {
    files: Vec<SpecFile>,
    spec_tree: Option<Arc<dyn FileTree>>,
}

impl GatewayBuilder {
    /// Declare one spec file.
    pub fn spec_file(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.files.push(SpecFile::new(name, path));
        self
    }

    /// Declare several spec files, keeping their order.
    pub fn spec_files<I>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = SpecFile>,
    {
        self.files.extend(files);
        self
    }

    /// Set the tree spec files are read from.
    pub fn spec_tree(mut self, tree: Arc<dyn FileTree>) -> Self {
        self.spec_tree = Some(tree);
        self
    }

    /// Build the gateway, failing if no spec tree was set.
    pub fn build(self) -> Result<SpecGateway, GatewayError> {
        let tree = self.spec_tree.ok_or(GatewayError::MissingSpecTree)?;
        Ok(SpecGateway::new(self.files, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use specgate_core::{Entry, MemoryTree};
    use tower::ServiceExt;

    const API_SPEC: &[u8] = include_bytes!("../testdata/api-spec.yaml");
    const PASSWD: &[u8] = include_bytes!("../testdata/passwd");
    const TEMPLATE_SINGLE: &[u8] = include_bytes!("../testdata/template-single.html");
    const TEMPLATE_MULTIPLE: &[u8] = include_bytes!("../testdata/template-multiple.html");

    fn spec_tree() -> Arc<dyn FileTree> {
        Arc::new(
            MemoryTree::new()
                .with_file("api-spec.yaml", API_SPEC)
                .with_file("passwd", PASSWD),
        )
    }

    fn empty_tree() -> Arc<dyn FileTree> {
        Arc::new(MemoryTree::new())
    }

    async fn send(gateway: SpecGateway, method: Method, target: &str) -> Response {
        gateway
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(target)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(resp: Response) -> Vec<u8> {
        axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn builder_requires_spec_tree() {
        let result = SpecGateway::builder()
            .spec_file("API Spec", "api-spec.yaml")
            .build();
        assert!(matches!(result, Err(GatewayError::MissingSpecTree)));
    }

    #[test]
    fn builder_registers_declared_files() {
        let gateway = SpecGateway::builder()
            .spec_file("API Spec", "api-spec.yaml")
            .spec_files(vec![SpecFile::new("Nested", "v1/../v2/api.json")])
            .spec_tree(empty_tree())
            .build()
            .unwrap();

        assert_eq!(gateway.registry().len(), 2);
        assert!(gateway.registry().contains("/specs/api-spec.yaml"));
        assert!(gateway.registry().contains("/specs/v2/api.json"));
    }

    #[tokio::test]
    async fn index_renders_single_entry_listing() {
        let gateway = SpecGateway::new(
            vec![SpecFile::new("API Spec", "api-spec.yaml")],
            empty_tree(),
        );

        let resp = send(gateway, Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, TEMPLATE_SINGLE);
    }

    #[tokio::test]
    async fn index_renders_multiple_entry_listing() {
        let gateway = SpecGateway::new(
            vec![
                SpecFile::new("API Spec 1", "api-spec-1.yaml"),
                SpecFile::new("API Spec 2", "api-spec-2.yaml"),
            ],
            empty_tree(),
        );

        let resp = send(gateway, Method::GET, "/index.html").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, TEMPLATE_MULTIPLE);
    }

    #[tokio::test]
    async fn declared_spec_is_served() {
        let gateway = SpecGateway::new(
            vec![SpecFile::new("API Spec", "api-spec.yaml")],
            spec_tree(),
        );

        let resp = send(gateway, Method::GET, "/specs/api-spec.yaml").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, API_SPEC);
    }

    #[tokio::test]
    async fn undeclared_file_in_tree_is_not_found() {
        let gateway = SpecGateway::new(
            vec![SpecFile::new("API Spec", "api-spec.yaml")],
            spec_tree(),
        );

        for target in [
            "/specs/passwd",
            "/specs/../passwd",
            "/specs/./passwd",
            "/specs/api-spec.yaml/../passwd",
            "/specs/%2e%2e/passwd",
            "/passwd",
            "/specs/",
            "/specs",
        ] {
            let resp = send(gateway.clone(), Method::GET, target).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{target}");
            assert_eq!(body_bytes(resp).await, b"Not Found\n", "{target}");
        }
    }

    #[tokio::test]
    async fn traversal_declaration_stays_in_namespace() {
        let tree = MemoryTree::new().with_file("etc/passwd", PASSWD);
        let gateway = SpecGateway::new(
            vec![SpecFile::new("Sneaky", "../../etc/passwd")],
            Arc::new(tree),
        );

        let resp = send(gateway.clone(), Method::GET, "/specs/etc/passwd").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(gateway, Method::GET, "/etc/passwd").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn percent_encoded_spec_path_is_decoded() {
        let tree = MemoryTree::new().with_file("my api.yaml", API_SPEC);
        let gateway = SpecGateway::new(vec![SpecFile::new("Mine", "my api.yaml")], Arc::new(tree));

        let resp = send(gateway, Method::GET, "/specs/my%20api.yaml").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, API_SPEC);
    }

    #[tokio::test]
    async fn assets_index_matches_bundled_bytes() {
        let gateway = SpecGateway::new(Vec::new(), empty_tree());
        let want = match bundled_assets().open("index.html").await.unwrap() {
            Entry::File(bytes) => bytes.into_owned(),
            Entry::Dir => panic!("index.html should be a file"),
        };

        let resp = send(gateway, Method::GET, "/assets/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_bytes(resp).await, want);
    }

    #[tokio::test]
    async fn missing_asset_is_not_found() {
        let gateway = SpecGateway::new(Vec::new(), empty_tree());
        let resp = send(gateway, Method::GET, "/assets/oauth2-redirect.html").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn swagger_ui_dist_is_served_locally() {
        let gateway = SpecGateway::new(Vec::new(), empty_tree());

        let resp = send(gateway.clone(), Method::GET, "/assets/swagger-ui-bundle.js").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/javascript; charset=utf-8"
        );
        assert_eq!(
            body_bytes(resp).await,
            include_bytes!("../assets/swagger-ui-bundle.js")
        );

        let resp = send(gateway.clone(), Method::GET, "/assets/swagger-ui.css").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");

        let resp = send(gateway, Method::GET, "/assets/favicon-16x16.png").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/png");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let gateway = SpecGateway::new(Vec::new(), empty_tree());
        let resp = send(gateway, Method::GET, "/openapi.json").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(resp).await, b"Not Found\n");
    }

    #[tokio::test]
    async fn non_get_methods_are_rejected() {
        let gateway = SpecGateway::new(
            vec![SpecFile::new("API Spec", "api-spec.yaml")],
            spec_tree(),
        );

        let cases = [
            (Method::POST, "/"),
            (Method::DELETE, "/index.html"),
            (Method::PUT, "/assets/favicon-16x16.png"),
            (Method::PATCH, "/specs/api-spec.yaml"),
            (Method::HEAD, "/specs/api-spec.yaml"),
        ];
        for (method, target) in cases {
            let resp = send(gateway.clone(), method.clone(), target).await;
            assert_eq!(
                resp.status(),
                StatusCode::METHOD_NOT_ALLOWED,
                "{method} {target}"
            );
            assert_eq!(body_bytes(resp).await, b"Method Not Allowed\n");
        }
    }

    #[tokio::test]
    async fn route_coerces_missing_leading_slash() {
        let gateway = SpecGateway::new(
            vec![SpecFile::new("API Spec", "api-spec.yaml")],
            spec_tree(),
        );

        let resp = gateway.route(&Method::GET, "specs/api-spec.yaml").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = gateway.route(&Method::GET, "").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_utf8_path_is_not_found() {
        let gateway = SpecGateway::new(Vec::new(), empty_tree());
        let resp = gateway.route(&Method::GET, "/specs/%ff%fe").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_gateway() {
        let gateway = SpecGateway::new(
            vec![SpecFile::new("API Spec", "api-spec.yaml")],
            spec_tree(),
        );

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let gateway = gateway.clone();
            tasks.push(tokio::spawn(async move {
                let resp = send(gateway, Method::GET, "/specs/api-spec.yaml").await;
                body_bytes(resp).await
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap(), API_SPEC);
        }
    }
}
