//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opendart_core::{Clock, DartError, ResponseCache, Result, SystemClock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    expires_at: DateTime<Utc>,
}

/// Simple in-memory response cache for testing and development.
///
/// Entries live in an `RwLock`-protected `HashMap` and are lost when the
/// cache is dropped.
#[derive(Debug)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemoryCache {
    /// Creates an empty cache reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl ResponseCache for InMemoryCache {
    #[instrument(skip(self))]
    async fn get(&self, fingerprint: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        match entries.get(fingerprint) {
            Some(entry) if self.clock.now() < entry.expires_at => {
                debug!("Cache hit");
                Ok(Some(entry.payload.clone()))
            }
            Some(_) => {
                debug!("Cache entry expired");
                Ok(None)
            }
            None => {
                debug!("Cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, payload), fields(payload_len = payload.len()))]
    async fn put(&self, fingerprint: &str, payload: &str, ttl: Duration) -> Result<()> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| DartError::Cache(format!("invalid TTL duration: {e}")))?;
        let entry = Entry {
            payload: payload.to_string(),
            expires_at: self.clock.now() + ttl,
        };

        let mut entries = self.entries.write().await;
        entries.insert(fingerprint.to_string(), entry);
        debug!("Cached response payload");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        Ok(before - entries.len())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use opendart_core::FixedClock;

    #[tokio::test]
    async fn expiry_is_strict() {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        ));
        let cache = InMemoryCache::new(clock.clone());

        cache.put("fp", "data", Duration::from_secs(60)).await.unwrap();
        assert!(cache.get("fp").await.unwrap().is_some());

        clock.advance(chrono::Duration::seconds(60));
        assert_eq!(cache.get("fp").await.unwrap(), None);
    }

    #[tokio::test]
    async fn purge_counts_removed_entries() {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        ));
        let cache = InMemoryCache::new(clock.clone());

        cache.put("a", "1", Duration::from_secs(10)).await.unwrap();
        cache.put("b", "2", Duration::from_secs(1000)).await.unwrap();

        clock.advance(chrono::Duration::seconds(60));
        assert_eq!(cache.purge_expired().await.unwrap(), 1);
        assert!(cache.get("b").await.unwrap().is_some());
    }
}
