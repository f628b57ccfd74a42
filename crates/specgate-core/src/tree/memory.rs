// ABOUTME: In-memory file tree keyed by relative path, for tests and programmatically built specs.
// ABOUTME: Directories are implied by file keys; nothing is ever read from disk.

use std::borrow::Cow;
use std::collections::BTreeMap;

use async_trait::async_trait;

use super::{Entry, FileTree, TreeError, is_implied_dir};

/// A tree held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: BTreeMap<String, Cow<'static, [u8]>>,
}

impl MemoryTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, returning the tree for chaining.
    pub fn with_file(
        mut self,
        path: impl Into<String>,
        contents: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Cow<'static, [u8]>>) {
        self.files.insert(path.into(), contents.into());
    }
}

#[async_trait]
impl FileTree for MemoryTree {
    async fn open(&self, path: &str) -> Result<Entry, TreeError> {
        if let Some(contents) = self.files.get(path) {
            return Ok(Entry::File(contents.clone()));
        }
        if is_implied_dir(path, self.files.keys().map(String::as_str)) {
            return Ok(Entry::Dir);
        }
        Err(TreeError::NotFound(path.to_string()))
    }
}
