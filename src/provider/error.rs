use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt cache document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure modes of the refresh workflow, in the order its steps can hit them
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Invalid event: {0}")]
    Validation(String),

    #[error("Upstream call failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Repository {namespace}/{repo_name} does not exist")]
    NotFound {
        namespace: String,
        repo_name: String,
    },

    #[error("Failed to store provider listing: {0}")]
    Persistence(#[from] CacheError),
}
