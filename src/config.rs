use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;

use crate::provider::cache::Cache;
use crate::provider::github::GitHubHost;

// =============================================================================
// Time-related constants
// =============================================================================

/// Maximum age of a cached version listing before a refresh refetches it
/// (1 hour), in milliseconds
pub const MAX_ALLOWED_AGE_MS: i64 = 60 * 60 * 1000;

/// Maximum allowed age as a duration
pub fn max_allowed_age() -> Duration {
    Duration::milliseconds(MAX_ALLOWED_AGE_MS)
}

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "provider-registry.log";

/// Process-wide configuration, constructed once at startup and shared across
/// invocations. Holds the only long-lived state: the cache handle and the
/// upstream client.
pub struct Config {
    pub store: Arc<Cache>,
    pub upstream: Arc<GitHubHost>,
    pub max_allowed_age: Duration,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir())?;
        let store = Arc::new(Cache::new(&db_path())?);

        let upstream = match std::env::var("GITHUB_TOKEN") {
            Ok(token) if !token.is_empty() => GitHubHost::default().with_token(&token),
            _ => GitHubHost::default(),
        };

        Ok(Self {
            store,
            upstream: Arc::new(upstream),
            max_allowed_age: max_allowed_age(),
        })
    }
}

/// Returns the path to the data directory for provider-registry.
/// Uses $XDG_DATA_HOME/provider-registry if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/provider-registry,
/// or ./provider-registry if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the database file.
pub fn db_path() -> PathBuf {
    data_dir().join("providers.db")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("provider-registry")
}
