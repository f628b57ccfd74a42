// ABOUTME: Compiled-in Swagger UI asset tree shared by every gateway in the process.
// ABOUTME: The tree index is built once behind a LazyLock and handed out as an Arc<dyn FileTree>.

use std::sync::{Arc, LazyLock};

use specgate_core::{EmbeddedTree, FileTree};

use crate::file_server::TreeServer;

const ASSET_FILES: &[(&str, &[u8])] = &[
    ("index.html", include_bytes!("../assets/index.html")),
    ("index.css", include_bytes!("../assets/index.css")),
    (
        "swagger-initializer.js",
        include_bytes!("../assets/swagger-initializer.js"),
    ),
    ("spec-selector.js", include_bytes!("../assets/spec-selector.js")),
    // swagger-ui-dist 5.17.14
    ("swagger-ui.css", include_bytes!("../assets/swagger-ui.css")),
    (
        "swagger-ui-bundle.js",
        include_bytes!("../assets/swagger-ui-bundle.js"),
    ),
    (
        "swagger-ui-standalone-preset.js",
        include_bytes!("../assets/swagger-ui-standalone-preset.js"),
    ),
    ("favicon-16x16.png", include_bytes!("../assets/favicon-16x16.png")),
    ("favicon-32x32.png", include_bytes!("../assets/favicon-32x32.png")),
];

static BUNDLED: LazyLock<Arc<EmbeddedTree>> = LazyLock::new(|| {
    tracing::debug!(files = ASSET_FILES.len(), "indexing bundled ui assets");
    Arc::new(EmbeddedTree::new(ASSET_FILES))
});

/// The bundled UI asset tree.
///
/// The standalone `index.html` reads its configuration from the query
/// string, so the tree is also usable on its own, e.g.
/// `/swagger/index.html?url=https://petstore.swagger.io/v2/swagger.json`.
pub fn bundled_assets() -> Arc<dyn FileTree> {
    BUNDLED.clone()
}

/// A file server over the bundled assets, for mounting without a gateway.
pub fn assets_service() -> TreeServer {
    TreeServer::new(bundled_assets())
}
