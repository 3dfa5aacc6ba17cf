//! Scan report rendering
//!
//! Renders a [`ScanReport`] as a plain-text summary, JSON, or Markdown for
//! the `check` command.

use serde::Serialize;

use crate::scanner::{Finding, ScanReport, SkippedDependency};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub checked: usize,
    pub outdated: usize,
    pub unchecked: usize,
}

impl ReportSummary {
    pub fn of(report: &ScanReport) -> Self {
        Self {
            checked: report.checked,
            outdated: report.findings.len(),
            unchecked: report.skipped.len(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    summary: ReportSummary,
    outdated: &'a [Finding],
    unchecked: &'a [SkippedDependency],
}

pub fn generate_json_report(file: &str, report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        file,
        summary: ReportSummary::of(report),
        outdated: &report.findings,
        unchecked: &report.skipped,
    })
}

pub fn generate_summary_report(file: &str, report: &ScanReport) -> String {
    let summary = ReportSummary::of(report);
    let mut lines = vec![
        format!("Outdated Dependency Check for {file}"),
        String::new(),
        format!("  Checked:   {}", summary.checked),
        format!("  Outdated:  {}", summary.outdated),
        format!("  Unchecked: {}", summary.unchecked),
        String::new(),
    ];

    for finding in &report.findings {
        lines.push(format!(
            "  {} {} -> {} (line {})",
            finding.name,
            finding.current_version,
            finding.latest_version,
            finding.line + 1
        ));
    }
    for skipped in &report.skipped {
        lines.push(format!(
            "  {} skipped: {} (line {})",
            skipped.name,
            skipped.reason.describe(),
            skipped.line + 1
        ));
    }
    if !report.is_empty() {
        lines.push(String::new());
    }

    if summary.outdated == 0 {
        lines.push("[OK] All checked dependencies are up to date.".to_string());
    } else {
        lines.push(format!("{} outdated dependencies found.", summary.outdated));
    }

    lines.join("\n")
}

pub fn generate_markdown_report(file: &str, report: &ScanReport) -> String {
    let summary = ReportSummary::of(report);
    let mut lines = vec![
        "# Outdated Dependency Report".to_string(),
        String::new(),
        format!("**File**: {file}"),
        format!("**Date**: {}", chrono::Local::now().format("%Y-%m-%d")),
        String::new(),
        "## Summary".to_string(),
        "| Status | Count |".to_string(),
        "|--------|-------|".to_string(),
        format!("| Checked | {} |", summary.checked),
        format!("| Outdated | {} |", summary.outdated),
        format!("| Unchecked | {} |", summary.unchecked),
        String::new(),
    ];

    if !report.findings.is_empty() {
        lines.push("## Outdated".to_string());
        lines.push(String::new());
        lines.push("| Package | Current | Latest | Line |".to_string());
        lines.push("|---------|---------|--------|------|".to_string());
        for finding in &report.findings {
            lines.push(format!(
                "| [{}](https://pub.dev/packages/{}) | {} | {} | {} |",
                finding.name,
                finding.name,
                finding.current_version,
                finding.latest_version,
                finding.line + 1
            ));
        }
        lines.push(String::new());
    }

    if !report.skipped.is_empty() {
        lines.push("## Unchecked".to_string());
        lines.push(String::new());
        for skipped in &report.skipped {
            lines.push(format!(
                "- **{}** (line {}): {}",
                skipped.name,
                skipped.line + 1,
                skipped.reason.describe()
            ));
        }
        lines.push(String::new());
    }

    if report.findings.is_empty() {
        lines.push("All checked dependencies are up to date.".to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::SkipReason;

    fn sample_report() -> ScanReport {
        ScanReport {
            findings: vec![Finding {
                name: "http".to_string(),
                line: 3,
                current_version: "1.0.0".to_string(),
                latest_version: "1.2.0".to_string(),
                version_start: 8,
                version_end: 14,
            }],
            skipped: vec![SkippedDependency {
                name: "intl".to_string(),
                line: 5,
                reason: SkipReason::Unreachable("timed out".to_string()),
            }],
            checked: 3,
        }
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report("pubspec.yaml", &sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["file"], "pubspec.yaml");
        assert_eq!(value["summary"]["checked"], 3);
        assert_eq!(value["summary"]["outdated"], 1);
        assert_eq!(value["summary"]["unchecked"], 1);
        assert_eq!(value["outdated"][0]["name"], "http");
        assert_eq!(value["outdated"][0]["latest_version"], "1.2.0");
        assert_eq!(value["unchecked"][0]["reason"]["kind"], "unreachable");
    }

    #[test]
    fn test_generate_summary_report() {
        let text = generate_summary_report("pubspec.yaml", &sample_report());

        assert!(text.contains("Outdated Dependency Check for pubspec.yaml"));
        assert!(text.contains("http 1.0.0 -> 1.2.0 (line 4)"));
        assert!(text.contains("intl skipped: registry unreachable (timed out) (line 6)"));
        assert!(text.contains("1 outdated dependencies found."));
    }

    #[test]
    fn test_generate_summary_report_up_to_date() {
        let report = ScanReport {
            checked: 2,
            ..Default::default()
        };
        let text = generate_summary_report("pubspec.yaml", &report);

        assert!(text.contains("[OK] All checked dependencies are up to date."));
    }

    #[test]
    fn test_generate_markdown_report() {
        let md = generate_markdown_report("pubspec.yaml", &sample_report());

        assert!(md.contains("# Outdated Dependency Report"));
        assert!(md.contains("**File**: pubspec.yaml"));
        assert!(md.contains("**Date**:"));
        assert!(md.contains("| Outdated | 1 |"));
        assert!(md.contains("| [http](https://pub.dev/packages/http) | 1.0.0 | 1.2.0 | 4 |"));
        assert!(md.contains("## Unchecked"));
        assert!(md.contains("- **intl** (line 6)"));
    }

    #[test]
    fn test_generate_markdown_report_no_findings() {
        let md = generate_markdown_report("pubspec.yaml", &ScanReport::default());

        assert!(!md.contains("## Outdated"));
        assert!(!md.contains("## Unchecked"));
        assert!(md.contains("All checked dependencies are up to date."));
    }
}
