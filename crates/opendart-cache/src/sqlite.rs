//! SQLite-based cache implementation.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use opendart_core::{Clock, DartError, ResponseCache, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Persistent SQLite-backed response cache.
///
/// Entries are keyed by fingerprint and overwritten in place on refresh
/// via an atomic upsert, so concurrent writers degrade to last-writer-wins
/// and readers never observe a half-written row. Writes commit before
/// `put` returns.
pub struct SqliteCache {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SqliteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCache").finish_non_exhaustive()
    }
}

impl SqliteCache {
    /// Creates a cache backed by a SQLite database file.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema
    /// creation fails.
    pub fn new(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| DartError::Cache(e.to_string()))?;
        let cache = Self {
            conn: Mutex::new(conn),
            clock,
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Creates an in-memory cache.
    ///
    /// Useful for testing; data is lost when the cache is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DartError::Cache(e.to_string()))?;
        let cache = Self {
            conn: Mutex::new(conn),
            clock,
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS api_cache (
                fingerprint TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| DartError::Cache(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_api_cache_expires_at
             ON api_cache(expires_at)",
            [],
        )
        .map_err(|e| DartError::Cache(e.to_string()))?;

        debug!("SQLite response cache schema initialized");
        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DartError::Cache(e.to_string()))
    }

    fn format_instant(instant: DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

#[async_trait]
impl ResponseCache for SqliteCache {
    #[instrument(skip(self))]
    async fn get(&self, fingerprint: &str) -> Result<Option<String>> {
        let conn = self.lock_conn()?;

        let row = conn
            .query_row(
                "SELECT payload, expires_at FROM api_cache WHERE fingerprint = ?1",
                params![fingerprint],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(|e| DartError::Cache(e.to_string()))?;

        let Some((payload, expires_at)) = row else {
            debug!("Cache miss");
            return Ok(None);
        };

        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|e| DartError::Cache(format!("invalid expiry timestamp: {e}")))?
            .with_timezone(&Utc);

        if self.clock.now() < expires_at {
            debug!("Cache hit");
            Ok(Some(payload))
        } else {
            debug!("Cache entry expired");
            Ok(None)
        }
    }

    #[instrument(skip(self, payload), fields(payload_len = payload.len()))]
    async fn put(&self, fingerprint: &str, payload: &str, ttl: Duration) -> Result<()> {
        let now = self.clock.now();
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| DartError::Cache(format!("invalid TTL duration: {e}")))?;
        let expires_at = Self::format_instant(now + ttl);
        let created_at = Self::format_instant(now);

        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO api_cache (fingerprint, payload, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(fingerprint) DO UPDATE SET
                 payload = excluded.payload,
                 expires_at = excluded.expires_at",
            params![fingerprint, payload, expires_at, created_at],
        )
        .map_err(|e| DartError::Cache(e.to_string()))?;

        debug!("Cached response payload");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self) -> Result<usize> {
        let now = Self::format_instant(self.clock.now());

        let conn = self.lock_conn()?;
        let deleted = conn
            .execute(
                "DELETE FROM api_cache WHERE expires_at <= ?1",
                params![now],
            )
            .map_err(|e| DartError::Cache(e.to_string()))?;

        if deleted > 0 {
            warn!("Purged {} expired cache entries", deleted);
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM api_cache", [])
            .map_err(|e| DartError::Cache(e.to_string()))?;

        debug!("Cleared all cache entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use opendart_core::FixedClock;

    fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn missing_entry_is_absent() {
        let cache = SqliteCache::in_memory(fixed_clock()).unwrap();
        assert_eq!(cache.get("deadbeef").await.unwrap(), None);
    }

    #[tokio::test]
    async fn entry_expires_at_ttl() {
        let clock = fixed_clock();
        let cache = SqliteCache::in_memory(clock.clone()).unwrap();

        cache
            .put("fp", r#"{"status":"000"}"#, Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(cache.get("fp").await.unwrap().is_some());

        // Exactly at expiry the entry must already read as absent.
        clock.advance(chrono::Duration::hours(1));
        assert_eq!(cache.get("fp").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites_in_place() {
        let clock = fixed_clock();
        let cache = SqliteCache::in_memory(clock.clone()).unwrap();

        cache
            .put("fp", "old", Duration::from_secs(10))
            .await
            .unwrap();
        cache
            .put("fp", "new", Duration::from_secs(3600))
            .await
            .unwrap();

        assert_eq!(cache.get("fp").await.unwrap().as_deref(), Some("new"));

        // The refreshed expiry applies, not the original one.
        clock.advance(chrono::Duration::seconds(30));
        assert_eq!(cache.get("fp").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn purge_removes_only_expired_rows() {
        let clock = fixed_clock();
        let cache = SqliteCache::in_memory(clock.clone()).unwrap();

        cache
            .put("short", "a", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .put("long", "b", Duration::from_secs(7200))
            .await
            .unwrap();

        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(cache.purge_expired().await.unwrap(), 1);
        assert!(cache.get("long").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let cache = SqliteCache::in_memory(fixed_clock()).unwrap();
        cache
            .put("fp", "payload", Duration::from_secs(3600))
            .await
            .unwrap();
        cache.clear().await.unwrap();
        assert_eq!(cache.get("fp").await.unwrap(), None);
    }
}
