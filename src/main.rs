// ABOUTME: Entry point for the specgate binary.
// ABOUTME: Loads configuration, initializes tracing, builds the gateway, and starts the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use specgate_core::{DirTree, SpecFile};
use specgate_server::config::{normalize_mount, parse_spec_item};
use specgate_server::{ServeConfig, SpecGateway, create_router, create_url_router};

/// Serve the Swagger UI with an allow-listed set of spec files.
///
/// Flags override the matching SPECGATE_* environment variables.
#[derive(Debug, Parser)]
#[command(name = "specgate", version, about)]
struct Cli {
    /// Socket address to listen on.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Directory spec files are read from.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Spec file to serve, as `Name=path` or `path` relative to --dir. Repeatable.
    #[arg(long = "spec", value_parser = parse_spec_item)]
    specs: Vec<SpecFile>,

    /// Path prefix the UI is mounted under; `/` mounts at the root.
    #[arg(long)]
    mount: Option<String>,

    /// Serve only the bundled UI, pointed at this remote spec URL.
    #[arg(long)]
    url: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut ServeConfig) -> anyhow::Result<()> {
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(dir) = self.dir {
            config.spec_dir = dir;
        }
        if !self.specs.is_empty() {
            config.specs = self.specs;
        }
        if let Some(mount) = self.mount {
            config.mount = normalize_mount(&mount)?;
        }
        if self.url.is_some() {
            config.spec_url = self.url;
        }
        config.validate()?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("specgate=debug,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ServeConfig::from_env()?;
    cli.apply(&mut config)?;

    let app = match &config.spec_url {
        Some(url) => {
            tracing::info!(url = %url, "serving bundled ui for remote spec");
            create_url_router(&config.mount, url)
        }
        None => {
            if config.specs.is_empty() {
                tracing::warn!("no spec files declared; only the ui and its assets will be served");
            }
            let tree = DirTree::new(&config.spec_dir)?;
            tracing::info!(dir = %tree.root().display(), specs = config.specs.len(), "serving spec directory");
            let gateway = SpecGateway::builder()
                .spec_files(config.specs.clone())
                .spec_tree(Arc::new(tree))
                .build()?;
            create_router(gateway, &config.mount)
        }
    };

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(
        "specgate listening on http://{}{}/",
        listener.local_addr()?,
        config.mount
    );

    axum::serve(listener, app).await?;
    Ok(())
}
