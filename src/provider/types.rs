//! Core data types for provider version metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of every provider repository on the upstream host
const REPO_NAME_PREFIX: &str = "terraform-provider";

/// Composite identity of a provider: publisher namespace plus provider type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderKey {
    pub namespace: String,
    pub provider_type: String,
}

impl ProviderKey {
    pub fn new(namespace: &str, provider_type: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            provider_type: provider_type.to_string(),
        }
    }

    /// Cache key in `namespace/type` form
    pub fn cache_key(&self) -> String {
        format!("{}/{}", self.namespace, self.provider_type)
    }

    /// Name of the upstream repository expected to host this provider
    pub fn repo_name(&self) -> String {
        repo_name_from_type(&self.provider_type)
    }
}

/// Derives the upstream repository name from a provider type.
///
/// Pure naming convention: the provider `aws` lives in a repository named
/// `terraform-provider-aws`.
pub fn repo_name_from_type(provider_type: &str) -> String {
    format!("{}-{}", REPO_NAME_PREFIX, provider_type)
}

/// A binary artifact published for one version of a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: String,
    pub arch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// One published version of a provider with its platform artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderVersion {
    pub version: String,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

/// Cached version listing for one provider.
///
/// `last_updated` is stamped by the store operation at write time; callers
/// never supply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDocument {
    pub key: String,
    pub versions: Vec<ProviderVersion>,
    pub last_updated: DateTime<Utc>,
}
