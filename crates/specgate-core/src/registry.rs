// ABOUTME: Closed-world access registry built once from the declared spec files.
// ABOUTME: Maps each declaration to its public URL path and answers O(1) membership checks.

use std::collections::HashSet;

use serde::Serialize;

use crate::path::{join, normalize};
use crate::spec_file::SpecFile;

/// Routing namespace under which declared spec files are served.
pub const SPECS_PREFIX: &str = "/specs";

/// Page-relative prefix used for links written into the index page.
pub const SPECS_HREF_PREFIX: &str = "./specs";

/// A declared spec file after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredSpec {
    /// Display label from the declaration.
    pub name: String,
    /// Request path that is allowed to reach this file, e.g. `/specs/api.yaml`.
    pub public_path: String,
    /// Link rendered into the index page, e.g. `./specs/api.yaml`.
    pub href: String,
    /// Path of the file inside the backing spec tree, e.g. `api.yaml`.
    pub backing_path: String,
}

impl RegisteredSpec {
    fn from_declared(file: &SpecFile) -> Self {
        let normalized = normalize(&file.path);
        Self {
            name: file.name.clone(),
            public_path: join(SPECS_PREFIX, &normalized),
            href: join(SPECS_HREF_PREFIX, &normalized),
            backing_path: normalized.trim_start_matches('/').to_string(),
        }
    }
}

/// The fixed set of spec paths a gateway may serve.
///
/// Built once at construction and never mutated. Paths that normalize to the
/// same public path share one membership entry but stay listed separately.
#[derive(Debug, Clone, Default)]
pub struct AccessRegistry {
    entries: Vec<RegisteredSpec>,
    public_paths: HashSet<String>,
}

impl AccessRegistry {
    /// Build the registry from the declared files, keeping declaration order.
    pub fn build<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = &'a SpecFile>,
    {
        let entries: Vec<RegisteredSpec> = files
            .into_iter()
            .map(RegisteredSpec::from_declared)
            .collect();
        let public_paths = entries.iter().map(|e| e.public_path.clone()).collect();

        tracing::debug!(count = entries.len(), "built spec access registry");

        Self {
            entries,
            public_paths,
        }
    }

    /// Registered entries in declaration order.
    pub fn entries(&self) -> &[RegisteredSpec] {
        &self.entries
    }

    /// Exact membership check against the public path set.
    pub fn contains(&self, public_path: &str) -> bool {
        self.public_paths.contains(public_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
