use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::provider::error::CacheError;
use crate::provider::store::VersionStore;
use crate::provider::types::{CacheDocument, ProviderVersion};

/// Durable version cache backed by SQLite.
///
/// One row per `namespace/type` key; the version listing is stored as a JSON
/// blob and overwritten whole on every refresh.
pub struct Cache {
    conn: Mutex<Connection>,
}

impl Cache {
    pub fn new(db_path: &Path) -> Result<Self, CacheError> {
        info!("Initializing cache database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let cache = Self {
            conn: Mutex::new(conn),
        };

        cache.create_schema()?;
        info!("Cache initialized successfully");

        Ok(cache)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS providers (
                key TEXT PRIMARY KEY,
                versions TEXT NOT NULL,
                last_updated INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        debug!("Database schema created successfully");
        Ok(())
    }
}

impl VersionStore for Cache {
    fn get_document(&self, key: &str) -> Result<Option<CacheDocument>, CacheError> {
        let conn = self.lock_conn()?;
        let result = conn.query_row(
            "SELECT versions, last_updated FROM providers WHERE key = ?1",
            [key],
            |row| {
                let versions: String = row.get(0)?;
                let last_updated: i64 = row.get(1)?;
                Ok((versions, last_updated))
            },
        );

        let (versions_json, last_updated_ms) = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let versions: Vec<ProviderVersion> = serde_json::from_str(&versions_json)?;
        let last_updated: DateTime<Utc> = DateTime::from_timestamp_millis(last_updated_ms)
            .ok_or(CacheError::InvalidTimestamp(last_updated_ms))?;

        Ok(Some(CacheDocument {
            key: key.to_string(),
            versions,
            last_updated,
        }))
    }

    fn put_versions(&self, key: &str, versions: Vec<ProviderVersion>) -> Result<(), CacheError> {
        debug!("Saving {} versions for {}", versions.len(), key);

        let versions_json = serde_json::to_string(&versions)?;
        let now = Self::current_timestamp_ms();

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO providers (key, versions, last_updated)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                versions = excluded.versions,
                last_updated = excluded.last_updated
            "#,
            (key, versions_json, now),
        )?;

        debug!("Successfully saved versions for {}", key);
        Ok(())
    }
}
