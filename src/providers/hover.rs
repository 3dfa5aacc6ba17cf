//! Hover provider showing registry details for a dependency

use tower_lsp::lsp_types::*;

use crate::parsers::Dependency;
use crate::registries::VersionInfo;
use crate::version::{is_newer, release_core};

const MAX_DESCRIPTION_CHARS: usize = 300;

/// Find the dependency declared under the cursor
pub fn dependency_at(dependencies: &[Dependency], position: Position) -> Option<&Dependency> {
    dependencies.iter().find(|d| {
        d.line == position.line
            && position.character >= d.name_start
            && position.character <= d.version_end
    })
}

/// Build the hover card for `dep`. `info` is `None` when the registry
/// lookup failed.
pub fn create_hover(dep: &Dependency, info: Option<&VersionInfo>) -> Hover {
    let content = match info {
        Some(info) => render_info(dep, info),
        None => format!("## {}\n\nCould not fetch package information.", dep.name),
    };

    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: content,
        }),
        range: Some(Range {
            start: Position {
                line: dep.line,
                character: dep.name_start,
            },
            end: Position {
                line: dep.line,
                character: dep.version_end,
            },
        }),
    }
}

fn render_info(dep: &Dependency, info: &VersionInfo) -> String {
    let mut parts = vec![format!("## {}\n", dep.name)];

    if info.discontinued {
        parts.push("**Discontinued** on pub.dev\n".to_string());
    }

    if let Some(desc) = &info.description {
        parts.push(format!("{}\n", shorten(desc.trim(), MAX_DESCRIPTION_CHARS)));
    }

    parts.push(format!("**Current:** {}", dep.version));

    let outdated = dep
        .current_version()
        .map(|current| is_newer(release_core(current), release_core(&info.latest)))
        .is_some_and(|result| matches!(result, Ok(true)));
    if outdated {
        parts.push(format!("**Latest:** {} (update available)", info.latest));
    } else {
        parts.push(format!("**Latest:** {}", info.latest));
    }

    if !info.versions.is_empty() {
        parts.push(format!("**Published versions:** {}", info.versions.len()));
    }

    parts.push(format!(
        "\n[pub.dev](https://pub.dev/packages/{})",
        dep.name
    ));

    if let Some(repo) = &info.repository {
        parts.push(format!("[Repository]({repo})"));
    }

    if let Some(homepage) = &info.homepage {
        parts.push(format!("[Homepage]({homepage})"));
    }

    parts.join("\n")
}

/// Cut `text` to at most `max_chars` characters, preferring a word
/// boundary, and mark the cut with `...`.
fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    let kept = match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => cut[..pos].trim_end(),
        _ => cut.as_str(),
    };
    format!("{kept}...")
}
