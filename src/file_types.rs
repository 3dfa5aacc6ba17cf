//! Manifest file detection
//!
//! Decides from a path or document URI whether a file is a pub manifest.

use tower_lsp::lsp_types::Url;

/// File name of the pub manifest
pub const PUBSPEC_FILE_NAME: &str = "pubspec.yaml";

/// Check whether a filesystem path or URI path points at a `pubspec.yaml`.
///
/// Only the final path component is considered, so `pubspec.yaml.bak` or a
/// directory named `pubspec.yaml/` do not match.
pub fn is_pubspec_path(path: &str) -> bool {
    let filename = path.rsplit(['/', '\\']).next().unwrap_or(path);
    filename == PUBSPEC_FILE_NAME
}

/// Check whether a document URI refers to a `pubspec.yaml`.
pub fn is_pubspec_uri(uri: &Url) -> bool {
    is_pubspec_path(uri.path())
}
