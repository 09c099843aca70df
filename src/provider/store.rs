//! Storage trait for cached provider version listings

#[cfg(test)]
use mockall::automock;

use tracing::warn;

use crate::provider::error::CacheError;
use crate::provider::types::{CacheDocument, ProviderVersion};

/// Trait for the durable version cache, keyed by `namespace/type`
#[cfg_attr(test, automock)]
pub trait VersionStore: Send + Sync {
    /// Reads the cached document for a key, `None` when nothing was stored yet
    fn get_document(&self, key: &str) -> Result<Option<CacheDocument>, CacheError>;

    /// Overwrites the stored listing for a key and stamps its `last_updated`.
    ///
    /// An empty `versions` list is a legitimate value and is stored as such.
    fn put_versions(&self, key: &str, versions: Vec<ProviderVersion>) -> Result<(), CacheError>;
}

/// Outcome of a cache read, keeping an unreachable cache distinguishable
/// from a key that was never stored
#[derive(Debug)]
pub enum CacheLookup {
    Found(CacheDocument),
    Missing,
    Degraded(CacheError),
}

impl CacheLookup {
    pub fn from_result(result: Result<Option<CacheDocument>, CacheError>) -> Self {
        match result {
            Ok(Some(document)) => CacheLookup::Found(document),
            Ok(None) => CacheLookup::Missing,
            Err(e) => CacheLookup::Degraded(e),
        }
    }

    /// Collapses the lookup to an optional document; a degraded read is
    /// logged and treated as absent
    pub fn into_document(self, key: &str) -> Option<CacheDocument> {
        match self {
            CacheLookup::Found(document) => Some(document),
            CacheLookup::Missing => None,
            CacheLookup::Degraded(e) => {
                warn!("Failed to get item from cache for {}: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn lookup_maps_found_document() {
        let document = CacheDocument {
            key: "opentofu/aws".to_string(),
            versions: vec![],
            last_updated: Utc::now(),
        };

        let lookup = CacheLookup::from_result(Ok(Some(document.clone())));
        assert!(matches!(lookup, CacheLookup::Found(_)));
        assert_eq!(lookup.into_document("opentofu/aws"), Some(document));
    }

    #[test]
    fn lookup_maps_absent_key_to_missing() {
        let lookup = CacheLookup::from_result(Ok(None));
        assert!(matches!(lookup, CacheLookup::Missing));
        assert_eq!(lookup.into_document("opentofu/aws"), None);
    }

    #[test]
    fn degraded_lookup_collapses_to_absent() {
        let lookup = CacheLookup::from_result(Err(CacheError::LockPoisoned));
        assert!(matches!(lookup, CacheLookup::Degraded(_)));
        assert_eq!(lookup.into_document("opentofu/aws"), None);
    }
}
