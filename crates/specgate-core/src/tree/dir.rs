// ABOUTME: File tree rooted at an OS directory, read asynchronously through tokio::fs.
// ABOUTME: Rejects any path component that is not a plain name so reads stay under the root.

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{Entry, FileTree, TreeError};

/// A tree backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirTree {
    root: PathBuf,
}

impl DirTree {
    /// Root a tree at `root`, which must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, TreeError> {
        let root = root.into();
        match std::fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => Ok(Self { root }),
            _ => Err(TreeError::NotADirectory(root)),
        }
    }

    /// Return the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a tree-relative path onto the filesystem, refusing anything but
    /// plain path segments.
    fn resolve(&self, path: &str) -> Result<PathBuf, TreeError> {
        let mut full = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(name)), None) if !segment.contains('\\') => {
                    full.push(name)
                }
                _ => return Err(TreeError::InvalidPath(path.to_string())),
            }
        }
        Ok(full)
    }
}

#[async_trait]
impl FileTree for DirTree {
    async fn open(&self, path: &str) -> Result<Entry, TreeError> {
        let full = self.resolve(path)?;
        let io_err = |source: std::io::Error| match source.kind() {
            ErrorKind::NotFound | ErrorKind::NotADirectory => TreeError::NotFound(path.to_string()),
            _ => TreeError::Io {
                path: path.to_string(),
                source,
            },
        };

        let meta = tokio::fs::metadata(&full).await.map_err(io_err)?;
        if meta.is_dir() {
            return Ok(Entry::Dir);
        }

        let contents = tokio::fs::read(&full).await.map_err(io_err)?;
        tracing::trace!(path, bytes = contents.len(), "read file from spec directory");
        Ok(Entry::File(Cow::Owned(contents)))
    }
}
