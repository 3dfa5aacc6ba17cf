#![no_main]

use libfuzzer_sys::fuzz_target;
use pubspec_lsp::parsers::ManifestReader;
use pubspec_lsp::parsers::pubspec::PubspecParser;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let deps = PubspecParser::new().extract_dependencies(content);
        let lines: Vec<&str> = content.lines().collect();

        for dep in &deps {
            assert!((dep.line as usize) < lines.len(), "dep.line out of range");

            let line = lines[dep.line as usize];
            let line_len = line.len() as u32;

            assert!(
                dep.name_start <= dep.name_end,
                "name_start must be <= name_end"
            );
            assert!(
                dep.name_end <= line_len,
                "name_end must be within line bounds"
            );
            assert!(
                dep.version_start <= dep.version_end,
                "version_start must be <= version_end"
            );
            assert!(
                dep.version_end <= line_len,
                "version_end must be within line bounds"
            );
            assert_eq!(
                line.get(dep.version_start as usize..dep.version_end as usize),
                Some(dep.version.as_str()),
                "version span must cover the constraint"
            );

            let _ = dep.current_version();
        }
    }
});
