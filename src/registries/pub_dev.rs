//! Client for pub.dev registry (Dart/Flutter packages)
//!
//! Uses `GET {base}/packages/{name}`, which returns the package's `latest`
//! version and every published version with its pubspec.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::http_client::create_shared_client;
use super::{LookupError, Registry, VersionInfo};
use crate::version::is_prerelease;

pub const DEFAULT_BASE_URL: &str = "https://pub.dev/api";

/// Client for the pub.dev registry
pub struct PubDevRegistry {
    client: Arc<Client>,
    base_url: String,
}

impl PubDevRegistry {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::with_client(create_shared_client()?))
    }

    pub fn with_client(client: Arc<Client>) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Target a pub-compatible API other than pub.dev (mirrors, tests).
    pub fn with_base_url(client: Arc<Client>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// pub.dev API response structures
#[derive(Debug, Deserialize)]
struct PubPackageResponse {
    latest: PubVersionInfo,
    #[serde(default)]
    versions: Vec<PubVersionInfo>,
}

#[derive(Debug, Deserialize)]
struct PubVersionInfo {
    version: String,
    #[serde(default)]
    pubspec: PubPubspec,
    #[serde(default)]
    retracted: bool,
}

#[derive(Debug, Default, Deserialize)]
struct PubPubspec {
    description: Option<String>,
    homepage: Option<String>,
    repository: Option<String>,
    #[serde(default)]
    discontinued: bool,
}

impl Registry for PubDevRegistry {
    async fn get_version_info(&self, package_name: &str) -> Result<VersionInfo, LookupError> {
        let url = format!("{}/packages/{package_name}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(package_name.to_string()));
        }
        if !status.is_success() {
            tracing::warn!("pub.dev returned {status} for {package_name}");
            return Err(LookupError::Unreachable(format!("{url} returned {status}")));
        }

        let pkg: PubPackageResponse = response.json().await.map_err(|e| {
            tracing::warn!("Invalid pub.dev response for {package_name}: {e}");
            LookupError::NotFound(package_name.to_string())
        })?;

        let latest = select_latest_stable(&pkg)
            .ok_or_else(|| LookupError::NotFound(package_name.to_string()))?;

        let versions = pkg
            .versions
            .iter()
            .filter(|v| !v.retracted)
            .map(|v| v.version.clone())
            .collect();

        Ok(VersionInfo {
            latest,
            versions,
            description: pkg.latest.pubspec.description,
            homepage: pkg.latest.pubspec.homepage,
            repository: pkg.latest.pubspec.repository,
            discontinued: pkg.latest.pubspec.discontinued,
        })
    }
}

/// pub.dev's `latest` is normally the newest stable release. When it is a
/// pre-release or retracted, fall back to the highest stable version listed.
fn select_latest_stable(pkg: &PubPackageResponse) -> Option<String> {
    if !pkg.latest.retracted && !is_prerelease(&pkg.latest.version) {
        return Some(pkg.latest.version.clone());
    }

    pkg.versions
        .iter()
        .filter(|v| !v.retracted && !is_prerelease(&v.version))
        .filter_map(|v| {
            semver::Version::parse(&v.version)
                .ok()
                .map(|parsed| (parsed, &v.version))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, version)| version.clone())
}
