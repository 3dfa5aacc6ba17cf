//! Scan a manifest for outdated dependencies
//!
//! Each declared dependency is looked up on the registry, one at a time and
//! in manifest order. A lookup failure or an uncomparable version never
//! aborts the scan; the dependency is recorded in [`ScanReport::skipped`]
//! instead.

use serde::{Deserialize, Serialize};

use crate::parsers::{Dependency, ManifestReader};
use crate::registries::{LookupError, Registry};
use crate::version::{VersionError, is_newer, release_core};

/// A dependency whose latest registry version is newer than the declared one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Package name
    pub name: String,
    /// Line of the declaration (0-indexed)
    pub line: u32,
    /// Version as declared, may carry a `-pre` or `+build` suffix
    pub current_version: String,
    /// Latest stable version on the registry
    pub latest_version: String,
    /// Column where the declared constraint starts
    pub version_start: u32,
    /// Column where the declared constraint ends
    pub version_end: u32,
}

/// Why a dependency could not be checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Registry has no version for this package
    NotFound,
    /// Registry could not be reached
    Unreachable(String),
    /// Declared or latest version is not dotted-numeric
    MalformedVersion(String),
    /// Constraint has no lower bound to compare (`any`, `<2.0.0`)
    NoVersion,
}

impl From<LookupError> for SkipReason {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(_) => SkipReason::NotFound,
            LookupError::Unreachable(detail) => SkipReason::Unreachable(detail),
        }
    }
}

impl From<VersionError> for SkipReason {
    fn from(err: VersionError) -> Self {
        SkipReason::MalformedVersion(err.to_string())
    }
}

impl SkipReason {
    pub fn describe(&self) -> String {
        match self {
            SkipReason::NotFound => "package not found on the registry".to_string(),
            SkipReason::Unreachable(detail) => format!("registry unreachable ({detail})"),
            SkipReason::MalformedVersion(detail) => format!("version not comparable ({detail})"),
            SkipReason::NoVersion => "constraint has no lower bound".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDependency {
    pub name: String,
    pub line: u32,
    pub reason: SkipReason,
}

/// Outcome of one scan, both lists in manifest order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub findings: Vec<Finding>,
    pub skipped: Vec<SkippedDependency>,
    /// Number of dependencies that were looked up
    pub checked: usize,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty() && self.skipped.is_empty()
    }
}

/// Which declared dependencies take part in a scan
#[derive(Debug, Clone)]
pub struct ScanFilter {
    /// Package name patterns never looked up (`*` wildcards allowed)
    pub ignore: Vec<String>,
    pub include_dev: bool,
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            include_dev: true,
        }
    }
}

impl ScanFilter {
    /// Whether `dep` should be looked up on the registry
    pub fn accepts(&self, dep: &Dependency) -> bool {
        if dep.dev && !self.include_dev {
            return false;
        }
        !self
            .ignore
            .iter()
            .any(|pattern| matches_ignore_pattern(pattern, &dep.name))
    }
}

/// Match a package name against a pattern where `*` matches any run of
/// characters.
pub fn matches_ignore_pattern(pattern: &str, name: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return false;
    };
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let parts: Vec<&str> = parts.collect();
    let Some((last, middle)) = parts.split_last() else {
        // No wildcard at all
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

/// Scan one manifest file.
///
/// Returns an empty report without reading dependencies or touching the
/// registry when `path` is not a manifest `reader` understands.
pub async fn scan<P, R>(
    path: &str,
    content: &str,
    reader: &P,
    registry: &R,
    filter: &ScanFilter,
) -> ScanReport
where
    P: ManifestReader,
    R: Registry,
{
    if !reader.is_manifest_file(path) {
        return ScanReport::default();
    }

    let dependencies = reader.extract_dependencies(content);
    tracing::info!("Parsed {} dependencies from {path}", dependencies.len());

    check_dependencies(path, &dependencies, registry, filter).await
}

/// Look up already extracted dependencies, in order.
///
/// `path` is only used for logging.
pub async fn check_dependencies<R: Registry>(
    path: &str,
    dependencies: &[Dependency],
    registry: &R,
    filter: &ScanFilter,
) -> ScanReport {
    let mut report = ScanReport::default();
    for dep in dependencies.iter().filter(|dep| filter.accepts(dep)) {
        report.checked += 1;
        match evaluate(dep, registry).await {
            Ok(Some(finding)) => report.findings.push(finding),
            Ok(None) => {}
            Err(reason) => {
                if let SkipReason::MalformedVersion(detail) = &reason {
                    tracing::warn!("Skipping {} on line {}: {detail}", dep.name, dep.line);
                } else {
                    tracing::debug!("Skipping {}: {}", dep.name, reason.describe());
                }
                report.skipped.push(SkippedDependency {
                    name: dep.name.clone(),
                    line: dep.line,
                    reason,
                });
            }
        }
    }

    tracing::info!(
        "{path}: {} outdated, {} unchecked",
        report.findings.len(),
        report.skipped.len()
    );
    report
}

/// Look up one dependency and compare it against the registry's latest.
async fn evaluate<R: Registry>(dep: &Dependency, registry: &R) -> Result<Option<Finding>, SkipReason> {
    let current = dep.current_version().ok_or(SkipReason::NoVersion)?;
    let info = registry.get_version_info(&dep.name).await?;

    if !is_newer(release_core(current), release_core(&info.latest))? {
        return Ok(None);
    }

    Ok(Some(Finding {
        name: dep.name.clone(),
        line: dep.line,
        current_version: current.to_string(),
        latest_version: info.latest,
        version_start: dep.version_start,
        version_end: dep.version_end,
    }))
}
