//! Configuration management for pubspec-lsp

use std::time::Duration;

use serde::Deserialize;
use tower_lsp::lsp_types::DiagnosticSeverity;

use crate::registries::pub_dev::DEFAULT_BASE_URL;
use crate::scanner::ScanFilter;

/// Default cache TTL (1 hour)
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default registry request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// LSP configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Diagnostics configuration
    pub diagnostics: DiagnosticsConfig,
    /// Registry configuration
    pub registry: RegistryConfig,
    /// Cache configuration
    pub cache: CacheConfig,
    /// Packages to ignore (`*` wildcards allowed)
    pub ignore: Vec<String>,
    /// Check `dev_dependencies` as well
    pub include_dev_dependencies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diagnostics: DiagnosticsConfig::default(),
            registry: RegistryConfig::default(),
            cache: CacheConfig::default(),
            ignore: Vec::new(),
            include_dev_dependencies: true,
        }
    }
}

/// Diagnostics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Enable diagnostics
    pub enabled: bool,
    /// Severity of outdated-version diagnostics ("hint", "information", "warning", "error")
    pub severity: String,
    /// Also report dependencies that could not be checked
    pub show_unchecked: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: "warning".to_string(),
            show_unchecked: false,
        }
    }
}

impl DiagnosticsConfig {
    /// Parse the configured severity, falling back to WARNING
    pub fn severity_level(&self) -> DiagnosticSeverity {
        match self.severity.to_lowercase().as_str() {
            "hint" => DiagnosticSeverity::HINT,
            "information" | "info" => DiagnosticSeverity::INFORMATION,
            "error" => DiagnosticSeverity::ERROR,
            _ => DiagnosticSeverity::WARNING,
        }
    }
}

/// Package registry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of a pub-compatible API
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Config {
    /// Parse configuration from initialization options
    pub fn from_init_options(options: Option<serde_json::Value>) -> Self {
        match options {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("Invalid initialization options, using defaults: {e}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Which dependencies scans and hovers look up
    pub fn scan_filter(&self) -> ScanFilter {
        ScanFilter {
            ignore: self.ignore.clone(),
            include_dev: self.include_dev_dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.diagnostics.enabled);
        assert!(!config.diagnostics.show_unchecked);
        assert_eq!(config.diagnostics.severity_level(), DiagnosticSeverity::WARNING);
        assert_eq!(config.registry.url, "https://pub.dev/api");
        assert_eq!(config.registry.timeout(), Duration::from_secs(10));
        assert_eq!(config.cache.ttl_secs, DEFAULT_CACHE_TTL_SECS);
        assert!(config.ignore.is_empty());
        assert!(config.include_dev_dependencies);
    }

    #[test]
    fn test_parse_from_json() {
        let json = json!({
            "diagnostics": {
                "enabled": false,
                "severity": "hint",
                "show_unchecked": true
            },
            "registry": {
                "url": "https://pub.example.com/api",
                "timeout_secs": 3
            },
            "cache": {
                "ttl_secs": 7200
            },
            "ignore": ["flutter_*", "internal_pkg"],
            "include_dev_dependencies": false
        });

        let config = Config::from_init_options(Some(json));
        assert!(!config.diagnostics.enabled);
        assert!(config.diagnostics.show_unchecked);
        assert_eq!(config.diagnostics.severity_level(), DiagnosticSeverity::HINT);
        assert_eq!(config.registry.url, "https://pub.example.com/api");
        assert_eq!(config.registry.timeout(), Duration::from_secs(3));
        assert_eq!(config.cache.ttl(), Duration::from_secs(7200));
        assert_eq!(config.ignore.len(), 2);
        assert!(!config.include_dev_dependencies);
    }

    #[test]
    fn test_partial_config() {
        let json = json!({
            "diagnostics": {
                "severity": "error"
            }
        });

        let config = Config::from_init_options(Some(json));
        assert_eq!(config.diagnostics.severity_level(), DiagnosticSeverity::ERROR);
        // Other fields should use defaults
        assert!(config.diagnostics.enabled);
        assert!(config.include_dev_dependencies);
        assert_eq!(config.registry.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_unknown_severity_falls_back_to_warning() {
        let config = DiagnosticsConfig {
            severity: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(config.severity_level(), DiagnosticSeverity::WARNING);

        let config = DiagnosticsConfig {
            severity: "Information".to_string(),
            ..Default::default()
        };
        assert_eq!(config.severity_level(), DiagnosticSeverity::INFORMATION);
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = RegistryConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_scan_filter_follows_config() {
        let config = Config::from_init_options(Some(json!({
            "ignore": ["firebase_*"],
            "include_dev_dependencies": false
        })));

        let filter = config.scan_filter();
        assert_eq!(filter.ignore, vec!["firebase_*"]);
        assert!(!filter.include_dev);

        let filter = Config::default().scan_filter();
        assert!(filter.ignore.is_empty());
        assert!(filter.include_dev);
    }

    #[test]
    fn test_from_init_options_none() {
        let config = Config::from_init_options(None);
        assert!(config.diagnostics.enabled);
    }

    #[test]
    fn test_from_init_options_invalid_json() {
        let json = json!("invalid");
        let config = Config::from_init_options(Some(json));
        assert!(config.diagnostics.enabled);
        assert!(config.include_dev_dependencies);
    }
}
