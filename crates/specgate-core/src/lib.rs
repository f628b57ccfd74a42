// ABOUTME: Core library for specgate, holding the declared spec model and access rules.
// ABOUTME: Defines path normalization, the closed-world access registry, and read-only file trees.

pub mod path;
pub mod registry;
pub mod spec_file;
pub mod tree;

pub use path::{join, normalize};
pub use registry::{AccessRegistry, RegisteredSpec, SPECS_HREF_PREFIX, SPECS_PREFIX};
pub use spec_file::SpecFile;
pub use tree::{DirTree, EmbeddedTree, Entry, FileTree, MemoryTree, TreeError};
