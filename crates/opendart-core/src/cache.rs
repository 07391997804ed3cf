//! Time-bounded response cache trait.
//!
//! The cache stores serialized provider responses keyed by a deterministic
//! fingerprint of the request (see `opendart-cache`). An entry is valid
//! only while its expiry lies strictly in the future; expired and missing
//! entries are indistinguishable to callers.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Trait for caching serialized provider responses with expiry.
///
/// Implementations must make `put` an atomic upsert: concurrent writers
/// for the same fingerprint may race, but readers must only ever observe
/// a complete old value or a complete new value, never a mix.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Retrieves a cached payload.
    ///
    /// Returns `Ok(Some(payload))` only if an entry exists and has not
    /// expired. Expired and absent entries both return `Ok(None)`.
    async fn get(&self, fingerprint: &str) -> Result<Option<String>>;

    /// Stores a payload under a fingerprint with the given time-to-live.
    ///
    /// Overwrites any existing entry in place (payload and expiry both
    /// replaced). The write is durably committed before this returns.
    async fn put(&self, fingerprint: &str, payload: &str, ttl: Duration) -> Result<()>;

    /// Physically removes expired entries.
    ///
    /// The engine never requires this for correctness - `get` already
    /// treats expired rows as absent - it exists for a periodic external
    /// sweep. Returns the number of entries removed.
    async fn purge_expired(&self) -> Result<usize>;

    /// Removes all entries.
    async fn clear(&self) -> Result<()>;
}
