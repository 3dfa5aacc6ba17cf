//! Registry clients for fetching package version information

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Information about a package from the registry
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VersionInfo {
    /// Latest stable version
    pub latest: String,
    /// All published, non-retracted versions
    pub versions: Vec<String>,
    /// Package description
    pub description: Option<String>,
    /// Homepage URL
    pub homepage: Option<String>,
    /// Repository URL (GitHub, etc.)
    pub repository: Option<String>,
    /// Whether the package is marked as discontinued
    pub discontinued: bool,
}

/// Why a registry lookup produced no version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The package does not exist or no version could be determined
    #[error("no version found for package '{0}'")]
    NotFound(String),
    /// The registry could not be reached or answered with an error
    #[error("registry unreachable: {0}")]
    Unreachable(String),
}

/// Trait for registry clients
#[allow(async_fn_in_trait)]
pub trait Registry: Send + Sync {
    /// Get version information for a package
    async fn get_version_info(&self, package_name: &str) -> Result<VersionInfo, LookupError>;
}

pub mod http_client;
pub mod pub_dev;
