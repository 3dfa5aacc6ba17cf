//! Manifest readers (pubspec.yaml)

use serde::{Deserialize, Serialize};

/// Represents a dependency extracted from a manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Version constraint as written (e.g., "^1.0.0", ">=1.2.0 <2.0.0", "any")
    pub version: String,
    /// Line number in the file (0-indexed)
    pub line: u32,
    /// Column where the package name starts
    pub name_start: u32,
    /// Column where the package name ends
    pub name_end: u32,
    /// Column where the version string starts
    pub version_start: u32,
    /// Column where the version string ends
    pub version_end: u32,
    /// Whether this is a dev dependency
    pub dev: bool,
}

impl Dependency {
    /// The version this declaration currently resolves from, taken from the
    /// lower bound of its constraint.
    ///
    /// `^1.2.3` and `>=1.2.3 <2.0.0` both give `1.2.3`. Returns `None` when
    /// the constraint has no lower bound (`any`, `<2.0.0`).
    pub fn current_version(&self) -> Option<&str> {
        let first = self.version.split_whitespace().next()?;
        if first.starts_with('<') {
            return None;
        }
        let bare = first.trim_start_matches(['>', '=', '^', '~']);
        if bare.is_empty() || bare == "any" {
            None
        } else {
            Some(bare)
        }
    }
}

/// Reads dependency declarations out of a project manifest.
pub trait ManifestReader: Send + Sync {
    /// Whether the file at `path` is a manifest this reader understands
    fn is_manifest_file(&self, path: &str) -> bool;

    /// Extract dependencies in the order they are declared
    fn extract_dependencies(&self, content: &str) -> Vec<Dependency>;
}

pub mod pubspec;
