// ABOUTME: File tree over a static table of compiled-in files, used for the bundled UI assets.
// ABOUTME: Indexes the table into a hash map once so lookups borrow the static bytes directly.

use std::borrow::Cow;
use std::collections::HashMap;

use async_trait::async_trait;

use super::{Entry, FileTree, TreeError, is_implied_dir};

/// A tree whose files are `'static` byte slices, typically from `include_bytes!`.
#[derive(Debug, Clone)]
pub struct EmbeddedTree {
    files: HashMap<&'static str, &'static [u8]>,
}

impl EmbeddedTree {
    /// Index a table of `(relative path, contents)` pairs.
    pub fn new(files: &[(&'static str, &'static [u8])]) -> Self {
        Self {
            files: files.iter().copied().collect(),
        }
    }

    /// Contents of a file, if present.
    pub fn get(&self, path: &str) -> Option<&'static [u8]> {
        self.files.get(path).copied()
    }
}

#[async_trait]
impl FileTree for EmbeddedTree {
    async fn open(&self, path: &str) -> Result<Entry, TreeError> {
        if let Some(bytes) = self.get(path) {
            return Ok(Entry::File(Cow::Borrowed(bytes)));
        }
        if is_implied_dir(path, self.files.keys().copied()) {
            return Ok(Entry::Dir);
        }
        Err(TreeError::NotFound(path.to_string()))
    }
}
