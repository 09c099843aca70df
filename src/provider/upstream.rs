//! Upstream host trait for provider repositories

#[cfg(test)]
use mockall::automock;

use crate::provider::error::UpstreamError;
use crate::provider::types::ProviderVersion;

/// Trait for the source-control host that is authoritative for provider
/// repositories and their published versions
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait UpstreamHost: Send + Sync {
    /// Checks whether `namespace/repo_name` exists on the host
    async fn repository_exists(
        &self,
        namespace: &str,
        repo_name: &str,
    ) -> Result<bool, UpstreamError>;

    /// Fetches all published versions for `namespace/repo_name`
    ///
    /// # Returns
    /// * `Ok(versions)` - ordered from newest to oldest
    /// * `Err(UpstreamError)` - if the fetch fails
    async fn list_versions(
        &self,
        namespace: &str,
        repo_name: &str,
    ) -> Result<Vec<ProviderVersion>, UpstreamError>;
}
