//! Code actions provider for updating dependencies

use std::collections::HashMap;

use tower_lsp::lsp_types::*;

use crate::parsers::Dependency;
use crate::scanner::Finding;

/// Create "Update to X.Y.Z" quick fixes for findings in the given range
pub fn create_code_actions(
    findings: &[Finding],
    dependencies: &[Dependency],
    uri: &Url,
    range: Range,
) -> Vec<CodeActionOrCommand> {
    findings
        .iter()
        .filter(|f| f.line >= range.start.line && f.line <= range.end.line)
        .map(|finding| {
            let constraint = dependencies
                .iter()
                .find(|d| d.line == finding.line && d.name == finding.name)
                .map(|d| d.version.as_str())
                .unwrap_or_default();
            create_update_action(finding, constraint, uri)
        })
        .collect()
}

fn create_update_action(finding: &Finding, constraint: &str, uri: &Url) -> CodeActionOrCommand {
    let new_text = format_version(constraint, &finding.latest_version);

    let edit = TextEdit {
        range: Range {
            start: Position {
                line: finding.line,
                character: finding.version_start,
            },
            end: Position {
                line: finding.line,
                character: finding.version_end,
            },
        },
        new_text,
    };

    let mut changes = HashMap::new();
    changes.insert(uri.clone(), vec![edit]);

    CodeActionOrCommand::CodeAction(CodeAction {
        title: format!("Update {} to {}", finding.name, finding.latest_version),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: None,
        edit: Some(WorkspaceEdit {
            changes: Some(changes),
            document_changes: None,
            change_annotations: None,
        }),
        command: None,
        is_preferred: Some(true),
        disabled: None,
        data: None,
    })
}

/// Keep a caret constraint a caret constraint; anything else becomes the
/// exact latest version.
fn format_version(constraint: &str, latest: &str) -> String {
    if constraint.starts_with('^') {
        format!("^{latest}")
    } else {
        latest.to_string()
    }
}
