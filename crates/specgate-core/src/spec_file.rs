// ABOUTME: Defines the SpecFile struct an embedding application uses to declare a spec document.
// ABOUTME: A declaration pairs a display name with a path relative to the backing spec tree.

use serde::{Deserialize, Serialize};

/// A specification file the gateway is allowed to serve.
///
/// `name` is the label shown in the UI. `path` is relative to the backing
/// spec tree handed to the gateway; it is normalized before use, so
/// traversal segments never leave the `/specs` namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecFile {
    pub name: String,
    pub path: String,
}

impl SpecFile {
    /// Create a new SpecFile from a display name and a tree-relative path.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}
