//! Reader for Dart/Flutter pubspec.yaml files

use super::{Dependency, ManifestReader};
use crate::file_types::is_pubspec_path;

/// Reader for pubspec.yaml dependency declarations
///
/// Only hosted dependencies with an inline version constraint are returned.
/// Blocks (`sdk:`, `git:`, `path:`, `hosted:`) and inline maps are skipped,
/// as are Flutter SDK packages.
#[derive(Debug, Default)]
pub struct PubspecParser;

impl PubspecParser {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestReader for PubspecParser {
    fn is_manifest_file(&self, path: &str) -> bool {
        is_pubspec_path(path)
    }

    fn extract_dependencies(&self, content: &str) -> Vec<Dependency> {
        let mut dependencies = Vec::new();
        let mut current_section: Option<DependencySection> = None;
        // Indentation of entries in the current section, fixed by the first one
        let mut entry_indent: Option<usize> = None;

        for (line_idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indent = indentation(line);
            if indent == 0 {
                current_section = DependencySection::from_header(trimmed);
                entry_indent = None;
                continue;
            }

            let Some(section) = current_section else {
                continue;
            };

            let expected = *entry_indent.get_or_insert(indent);
            if indent > expected {
                // Inside a git/path/sdk/hosted block
                continue;
            }
            if indent < expected {
                entry_indent = Some(indent);
            }

            if let Some(dep) = parse_entry(line, indent, line_idx as u32, section.is_dev()) {
                dependencies.push(dep);
            }
        }

        dependencies
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DependencySection {
    Dependencies,
    DevDependencies,
    DependencyOverrides,
}

impl DependencySection {
    fn from_header(line: &str) -> Option<Self> {
        let (key, rest) = strip_comment(line).split_once(':')?;
        if !rest.trim().is_empty() {
            return None;
        }
        match key.trim() {
            "dependencies" => Some(Self::Dependencies),
            "dev_dependencies" => Some(Self::DevDependencies),
            "dependency_overrides" => Some(Self::DependencyOverrides),
            _ => None,
        }
    }

    fn is_dev(&self) -> bool {
        matches!(self, DependencySection::DevDependencies)
    }
}

/// Parse a `name: constraint` entry line.
fn parse_entry(line: &str, indent: usize, line_num: u32, dev: bool) -> Option<Dependency> {
    let body = strip_comment(&line[indent..]);
    let (key, value) = body.split_once(':')?;

    let name = key.trim();
    if name.is_empty() || name.contains(char::is_whitespace) || is_flutter_sdk_dependency(name) {
        return None;
    }

    let raw = value.trim();
    // Empty value opens a block; `{` is an inline map
    if raw.is_empty() || raw.starts_with('{') || raw.contains(':') {
        return None;
    }

    let (version, quote_offset) = unquote(raw);
    if version.trim().is_empty() {
        return None;
    }

    let name_start = indent + (key.len() - key.trim_start().len());
    let value_start = indent + key.len() + 1;
    let version_start = value_start + (value.len() - value.trim_start().len()) + quote_offset;

    Some(Dependency {
        name: name.to_string(),
        version: version.to_string(),
        line: line_num,
        name_start: name_start as u32,
        name_end: (name_start + name.len()) as u32,
        version_start: version_start as u32,
        version_end: (version_start + version.len()) as u32,
        dev,
    })
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Drop a trailing YAML comment. A `#` only starts a comment at the
/// beginning or after whitespace.
fn strip_comment(text: &str) -> &str {
    if text.starts_with('#') {
        return "";
    }
    match text.find(" #").or_else(|| text.find("\t#")) {
        Some(pos) => text[..pos].trim_end(),
        None => text.trim_end(),
    }
}

/// Remove a matching pair of surrounding quotes, returning the inner text and
/// the byte offset of its start within `raw`.
fn unquote(raw: &str) -> (&str, usize) {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return (&raw[1..raw.len() - 1], 1);
        }
    }
    (raw, 0)
}

/// Check if a package is a Flutter SDK dependency
fn is_flutter_sdk_dependency(name: &str) -> bool {
    matches!(
        name,
        "flutter" | "flutter_test" | "flutter_localizations" | "flutter_driver" | "flutter_web_plugins"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<Dependency> {
        PubspecParser::new().extract_dependencies(content)
    }

    #[test]
    fn test_is_manifest_file() {
        let parser = PubspecParser::new();
        assert!(parser.is_manifest_file("/app/pubspec.yaml"));
        assert!(!parser.is_manifest_file("/app/pubspec.lock"));
        assert!(!parser.is_manifest_file("/app/lib/main.dart"));
    }

    #[test]
    fn test_parse_simple_dependencies() {
        let content = r#"
name: my_app
version: 1.0.0

dependencies:
  http: ^1.0.0
  provider: ^6.0.0

dev_dependencies:
  mockito: ^5.4.0
"#;
        let deps = parse(content);

        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].name, "http");
        assert_eq!(deps[0].version, "^1.0.0");
        assert!(!deps[0].dev);
        assert_eq!(deps[1].name, "provider");
        assert_eq!(deps[2].name, "mockito");
        assert!(deps[2].dev);
    }

    #[test]
    fn test_line_numbers_are_zero_based() {
        let content = "dependencies:\n  http: ^1.0.0\n  path: 1.8.0\n";
        let deps = parse(content);

        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].line, 1);
        assert_eq!(deps[1].line, 2);
    }

    #[test]
    fn test_version_positions() {
        let content = "dependencies:\n  http: ^1.0.0\n";
        let deps = parse(content);

        let http = &deps[0];
        assert_eq!(http.name_start, 2);
        assert_eq!(http.name_end, 6);
        assert_eq!(http.version_start, 8);
        assert_eq!(http.version_end, 14);
        let line = content.lines().nth(1).unwrap();
        assert_eq!(
            &line[http.version_start as usize..http.version_end as usize],
            "^1.0.0"
        );
    }

    #[test]
    fn test_quoted_versions() {
        let content = r#"
dependencies:
  http: "^1.0.0"
  provider: '^6.0.0'
"#;
        let deps = parse(content);

        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].version, "^1.0.0");
        assert_eq!(deps[1].version, "^6.0.0");

        let line = content.lines().nth(2).unwrap();
        assert_eq!(
            &line[deps[0].version_start as usize..deps[0].version_end as usize],
            "^1.0.0"
        );
    }

    #[test]
    fn test_range_constraint_kept_verbatim() {
        let content = "dependencies:\n  intl: \">=0.17.0 <0.19.0\"\n";
        let deps = parse(content);

        assert_eq!(deps[0].version, ">=0.17.0 <0.19.0");
        assert_eq!(deps[0].current_version(), Some("0.17.0"));
    }

    #[test]
    fn test_trailing_comments() {
        let content = "dependencies:\n  http: ^1.0.0 # pinned for now\n  # provider: ^6.0.0\n";
        let deps = parse(content);

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].version, "^1.0.0");
    }

    #[test]
    fn test_skip_flutter_sdk() {
        let content = r#"
dependencies:
  flutter:
    sdk: flutter
  http: ^1.0.0

dev_dependencies:
  flutter_test:
    sdk: flutter
  mockito: ^5.4.0
"#;
        let deps = parse(content);

        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "http");
        assert_eq!(deps[1].name, "mockito");
    }

    #[test]
    fn test_skip_git_path_and_hosted_blocks() {
        let content = r#"
dependencies:
  http: ^1.0.0
  custom_pkg:
    git:
      url: https://github.com/user/repo.git
      ref: main
  local_pkg:
    path: ../local_pkg
  private_pkg:
    hosted: https://pub.example.com
    version: ^2.0.0
  inline_pkg: {path: ../inline}
  provider: ^6.0.0
"#;
        let deps = parse(content);

        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["http", "provider"]);
    }

    #[test]
    fn test_other_sections_ignored() {
        let content = r#"
name: my_app
environment:
  sdk: ">=3.0.0 <4.0.0"
  flutter: ">=3.10.0"

dependencies:
  http: ^1.0.0

flutter:
  uses-material-design: true
  assets:
    - images/a.png
"#;
        let deps = parse(content);

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "http");
    }

    #[test]
    fn test_dependency_overrides() {
        let content = r#"
dependencies:
  http: ^1.0.0

dependency_overrides:
  http: ^1.1.0
"#;
        let deps = parse(content);

        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].version, "^1.1.0");
        assert!(!deps[1].dev);
    }

    #[test]
    fn test_four_space_indentation() {
        let content = "dependencies:\n    http: ^1.0.0\n    provider:\n        path: ../p\n    intl: any\n";
        let deps = parse(content);

        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["http", "intl"]);
        assert_eq!(deps[1].current_version(), None);
    }

    #[test]
    fn test_section_header_with_comment() {
        let content = "dependencies: # runtime\n  http: ^1.0.0\n";
        let deps = parse(content);

        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_not_a_manifest_content() {
        assert!(parse("").is_empty());
        assert!(parse("just some text\nwithout structure").is_empty());
    }

    #[test]
    fn test_positions_within_line_bounds() {
        let content = "dependencies:\n  a: \"\"\n  b: '\n  c: \"1\n  d:x\n  e: 1.0.0\n";
        let deps = parse(content);
        let lines: Vec<&str> = content.lines().collect();

        for dep in &deps {
            let line = lines[dep.line as usize];
            assert!(dep.name_start <= dep.name_end);
            assert!(dep.version_start <= dep.version_end);
            assert!(dep.version_end as usize <= line.len());
        }
    }
}
