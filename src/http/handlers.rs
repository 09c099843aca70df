//! Registry API handlers serving provider data from the version cache

use std::sync::Arc;

use serde_json::json;
use tracing::error;

use crate::http::route::{Handler, PathParams, Router};
use crate::http::types::{Request, Response};
use crate::provider::store::VersionStore;
use crate::provider::types::{CacheDocument, ProviderKey};

/// Download pattern: five non-empty segments after the fixed prefix
pub const DOWNLOAD_PATTERN: &str =
    "/v1/providers/{namespace}/{type}/{version}/download/{os}/{arch}";

/// List pattern: two non-empty segments after the fixed prefix, fixed suffix
pub const LIST_PATTERN: &str = "/v1/providers/{namespace}/{type}/versions";

/// Builds the registry route table in its fixed priority order
pub fn registry_router(store: Arc<dyn VersionStore>) -> Router {
    Router::new()
        .route(DOWNLOAD_PATTERN, DownloadHandler::new(store.clone()))
        .route(LIST_PATTERN, ListVersionsHandler::new(store))
}

fn stored_document(store: &dyn VersionStore, params: &PathParams<'_>) -> Option<CacheDocument> {
    let key = ProviderKey::new(params["namespace"], params["type"]).cache_key();
    match store.get_document(&key) {
        Ok(document) => document,
        Err(e) => {
            error!("Failed to read cache for {}: {}", key, e);
            None
        }
    }
}

/// Responds to `GET /v1/providers/{namespace}/{type}/versions` with the
/// cached version listing
pub struct ListVersionsHandler {
    store: Arc<dyn VersionStore>,
}

impl ListVersionsHandler {
    pub fn new(store: Arc<dyn VersionStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Handler for ListVersionsHandler {
    async fn handle(&self, _request: &Request, params: PathParams<'_>) -> Response {
        let Some(document) = stored_document(self.store.as_ref(), &params) else {
            return Response::not_found();
        };

        match serde_json::to_string(&json!({ "versions": document.versions })) {
            Ok(body) => Response::ok_json(body),
            Err(e) => {
                error!("Failed to serialize version listing: {}", e);
                Response::status(500)
            }
        }
    }
}

/// Responds to the download path with the platform artifact for the
/// requested version, os, and arch
pub struct DownloadHandler {
    store: Arc<dyn VersionStore>,
}

impl DownloadHandler {
    pub fn new(store: Arc<dyn VersionStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Handler for DownloadHandler {
    async fn handle(&self, _request: &Request, params: PathParams<'_>) -> Response {
        let Some(document) = stored_document(self.store.as_ref(), &params) else {
            return Response::not_found();
        };

        let platform = document
            .versions
            .iter()
            .find(|v| v.version == params["version"])
            .and_then(|v| {
                v.platforms
                    .iter()
                    .find(|p| p.os == params["os"] && p.arch == params["arch"])
            });

        let Some(platform) = platform else {
            return Response::not_found();
        };

        match serde_json::to_string(platform) {
            Ok(body) => Response::ok_json(body),
            Err(e) => {
                error!("Failed to serialize download payload: {}", e);
                Response::status(500)
            }
        }
    }
}
