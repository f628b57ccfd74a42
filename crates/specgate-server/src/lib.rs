// ABOUTME: HTTP gateway for specgate, serving the bundled Swagger UI and declared spec files.
// ABOUTME: Exposes the SpecGateway tower service, the tree file server, config loading, and router builders.

pub mod assets;
pub mod config;
pub mod file_server;
pub mod gateway;
pub mod index;
pub mod response;
pub mod routes;

pub use assets::{assets_service, bundled_assets};
pub use config::{ConfigError, ServeConfig};
pub use file_server::TreeServer;
pub use gateway::{GatewayBuilder, GatewayError, SpecGateway};
pub use routes::{create_router, create_url_router};
