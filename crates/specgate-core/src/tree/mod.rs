// ABOUTME: Read-only file tree abstraction shared by the bundled assets and the backing spec tree.
// ABOUTME: Provides the FileTree trait plus compiled-in, in-memory, and OS directory implementations.

pub mod dir;
pub mod embedded;
pub mod memory;

use std::borrow::Cow;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use dir::DirTree;
pub use embedded::EmbeddedTree;
pub use memory::MemoryTree;

/// Errors that can occur while reading from a file tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    /// True for errors a file server should answer with 404 rather than 500.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::NotFound(_) | TreeError::InvalidPath(_))
    }
}

/// What a path inside a tree resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(Cow<'static, [u8]>),
    Dir,
}

/// A read-only source of files addressed by slash-separated relative paths.
///
/// Paths carry no leading slash and the empty path names the root
/// directory. Implementations never write.
#[async_trait]
pub trait FileTree: Send + Sync {
    /// Resolve `path` to a file's contents or a directory marker.
    async fn open(&self, path: &str) -> Result<Entry, TreeError>;
}

/// True when `path` is a directory implied by the given file keys.
fn is_implied_dir<'a, I>(path: &str, mut keys: I) -> bool
where
    I: Iterator<Item = &'a str>,
{
    if path.is_empty() {
        return true;
    }
    keys.any(|key| {
        key.len() > path.len() && key.starts_with(path) && key.as_bytes()[path.len()] == b'/'
    })
}
