//! pubspec-lsp - outdated dependency checker for Dart/Flutter projects
//!
//! Reads the dependencies declared in a `pubspec.yaml`, asks pub.dev for the
//! latest release of each, and reports the ones that are behind. Runs as a
//! Language Server or as a one-shot `check` command.

pub mod backend;
pub mod cache;
pub mod config;
pub mod document;
pub mod file_types;
pub mod parsers;
pub mod providers;
pub mod registries;
pub mod reports;
pub mod scanner;
pub mod version;
