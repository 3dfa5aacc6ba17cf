//! Diagnostics provider for outdated dependencies

use tower_lsp::lsp_types::*;

use crate::parsers::Dependency;
use crate::scanner::{Finding, ScanReport, SkippedDependency};

pub const DIAGNOSTIC_SOURCE: &str = "pubspec-lsp";

/// Create diagnostics for a scan report
///
/// One diagnostic per finding, using `severity`. When `show_unchecked` is
/// set, skipped dependencies also get a hint so the user can tell them
/// apart from up-to-date ones.
pub fn create_diagnostics(
    report: &ScanReport,
    dependencies: &[Dependency],
    severity: DiagnosticSeverity,
    show_unchecked: bool,
) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = report
        .findings
        .iter()
        .map(|finding| create_outdated_diagnostic(finding, severity))
        .collect();

    if show_unchecked {
        diagnostics.extend(
            report
                .skipped
                .iter()
                .filter_map(|skipped| create_unchecked_diagnostic(skipped, dependencies)),
        );
    }

    diagnostics
}

fn version_range(line: u32, start: u32, end: u32) -> Range {
    Range {
        start: Position {
            line,
            character: start,
        },
        end: Position {
            line,
            character: end,
        },
    }
}

/// Create a diagnostic for an outdated dependency
fn create_outdated_diagnostic(finding: &Finding, severity: DiagnosticSeverity) -> Diagnostic {
    Diagnostic {
        range: version_range(finding.line, finding.version_start, finding.version_end),
        severity: Some(severity),
        code: Some(NumberOrString::String("outdated".to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: format!(
            "A newer version of {} is available: {} -> {}",
            finding.name, finding.current_version, finding.latest_version
        ),
        related_information: None,
        tags: None,
        code_description: None,
        data: None,
    }
}

/// Create a hint for a dependency the scan could not check
fn create_unchecked_diagnostic(
    skipped: &SkippedDependency,
    dependencies: &[Dependency],
) -> Option<Diagnostic> {
    let dep = dependencies
        .iter()
        .find(|d| d.line == skipped.line && d.name == skipped.name)?;

    Some(Diagnostic {
        range: version_range(dep.line, dep.version_start, dep.version_end),
        severity: Some(DiagnosticSeverity::HINT),
        code: Some(NumberOrString::String("unchecked".to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: format!("Could not check {}: {}", dep.name, skipped.reason.describe()),
        related_information: None,
        tags: None,
        code_description: None,
        data: None,
    })
}
