// ABOUTME: Configuration loading and validation for the specgate server.
// ABOUTME: Reads SPECGATE_* environment variables and parses the declared spec file list.

use std::net::SocketAddr;
use std::path::PathBuf;

use specgate_core::SpecFile;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SPECGATE_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("invalid spec list: {0}")]
    InvalidSpecList(String),

    #[error("invalid mount prefix {0:?}: must be a plain path such as /swagger-ui")]
    InvalidMount(String),

    #[error("both spec files and a spec URL are configured; choose one")]
    ConflictingSources,

    #[error("serving a spec URL needs a mount prefix other than /")]
    UrlModeAtRoot,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub spec_dir: PathBuf,
    pub specs: Vec<SpecFile>,
    /// Normalized mount prefix without trailing slash; empty means the root.
    pub mount: String,
    pub spec_url: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8888)),
            spec_dir: PathBuf::from("."),
            specs: Vec::new(),
            mount: "/swagger-ui".to_string(),
            spec_url: None,
        }
    }
}

impl ServeConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - SPECGATE_BIND: socket address to bind (default: 127.0.0.1:8888)
    /// - SPECGATE_SPEC_DIR: directory spec files are read from (default: .)
    /// - SPECGATE_SPECS: declared spec files, a JSON array of {name, path}
    ///   objects or a comma separated list of `Name=path` / `path` items
    /// - SPECGATE_MOUNT: path prefix the UI is served under (default: /swagger-ui)
    /// - SPECGATE_SPEC_URL: serve only the bundled UI pointed at this URL
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind = match std::env::var("SPECGATE_BIND") {
            Ok(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidBind(raw))?,
            Err(_) => defaults.bind,
        };

        let spec_dir = std::env::var("SPECGATE_SPEC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.spec_dir);

        let specs = match std::env::var("SPECGATE_SPECS") {
            Ok(raw) => parse_spec_list(&raw)?,
            Err(_) => Vec::new(),
        };

        let mount = match std::env::var("SPECGATE_MOUNT") {
            Ok(raw) => normalize_mount(&raw)?,
            Err(_) => defaults.mount,
        };

        let spec_url = std::env::var("SPECGATE_SPEC_URL")
            .ok()
            .filter(|u| !u.is_empty());

        let config = Self {
            bind,
            spec_dir,
            specs,
            mount,
            spec_url,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check combinations that individual fields cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spec_url.is_some() {
            if !self.specs.is_empty() {
                return Err(ConfigError::ConflictingSources);
            }
            if self.mount.is_empty() {
                return Err(ConfigError::UrlModeAtRoot);
            }
        }
        Ok(())
    }
}

/// Parse a declared spec list: a JSON array, or comma separated items.
pub fn parse_spec_list(raw: &str) -> Result<Vec<SpecFile>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| ConfigError::InvalidSpecList(e.to_string()));
    }

    trimmed
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(parse_spec_item)
        .collect()
}

/// Parse one `Name=path` item; a bare path doubles as its display name.
pub fn parse_spec_item(raw: &str) -> Result<SpecFile, ConfigError> {
    let item = raw.trim();
    let (name, path) = match item.split_once('=') {
        Some((name, path)) => (name.trim(), path.trim()),
        None => (item, item),
    };

    if name.is_empty() || path.is_empty() {
        return Err(ConfigError::InvalidSpecList(format!(
            "expected Name=path or path, got {item:?}"
        )));
    }
    Ok(SpecFile::new(name, path))
}

/// Normalize a mount prefix to `/a/b` form, or the empty string for the root.
pub fn normalize_mount(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let valid = trimmed.split('/').all(|segment| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && !segment.contains(['{', '}', '*', '?', '#', '\\'])
    });
    if !valid {
        return Err(ConfigError::InvalidMount(raw.to_string()));
    }
    Ok(format!("/{trimmed}"))
}
