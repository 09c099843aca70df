//! Cache population workflow for provider version listings

use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::info;

use crate::provider::error::RefreshError;
use crate::provider::store::{CacheLookup, VersionStore};
use crate::provider::types::ProviderKey;
use crate::provider::upstream::UpstreamHost;

/// Trigger event naming the provider whose versions should be refreshed
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshEvent {
    pub namespace: String,
    #[serde(rename = "type")]
    pub provider_type: String,
}

impl RefreshEvent {
    pub fn new(namespace: &str, provider_type: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            provider_type: provider_type.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), RefreshError> {
        if self.namespace.is_empty() {
            return Err(RefreshError::Validation("namespace is required".to_string()));
        }
        if self.provider_type.is_empty() {
            return Err(RefreshError::Validation("type is required".to_string()));
        }
        Ok(())
    }

    pub fn key(&self) -> ProviderKey {
        ProviderKey::new(&self.namespace, &self.provider_type)
    }
}

/// Outcome of a successful refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refreshed {
    /// A new listing was fetched and stored
    Stored,
    /// The cached listing was younger than the allowed age; nothing was done
    Fresh,
}

/// Refreshes the cached version listing for one provider.
///
/// Runs validate, cache lookup, staleness check, repository existence check,
/// fetch, and store, strictly in that order. The store is the only mutating
/// step and only ever runs last, so any earlier failure leaves previously
/// cached data untouched. A failed cache read is logged and treated as a
/// missing document rather than aborting the refresh.
pub async fn refresh_provider<S: VersionStore + ?Sized>(
    store: &S,
    upstream: &dyn UpstreamHost,
    event: &RefreshEvent,
    max_allowed_age: Duration,
) -> Result<Refreshed, RefreshError> {
    event.validate()?;

    let key = event.key();
    let cache_key = key.cache_key();
    info!("Fetching versions for {}", cache_key);

    let lookup = CacheLookup::from_result(store.get_document(&cache_key));
    if let Some(document) = lookup.into_document(&cache_key) {
        if Utc::now() - document.last_updated < max_allowed_age {
            info!("Document is up to date, not updating");
            return Ok(Refreshed::Fresh);
        }
    }

    let repo_name = key.repo_name();

    let exists = upstream
        .repository_exists(&event.namespace, &repo_name)
        .await?;
    if !exists {
        return Err(RefreshError::NotFound {
            namespace: event.namespace.clone(),
            repo_name,
        });
    }

    info!("Repo {}/{} exists", event.namespace, repo_name);

    let versions = upstream.list_versions(&event.namespace, &repo_name).await?;
    info!("Found {} versions", versions.len());

    // An empty listing is a legitimate result and is stored as such
    store.put_versions(&cache_key, versions)?;

    Ok(Refreshed::Stored)
}
