use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use super::errors::CacheError;

/// Expiring key-value cache client used by `CachedPostStorage`.
///
/// `Ok(None)` is the only way to report a miss; any `Err` is a cache failure.
#[async_trait]
pub trait PostCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous entry and restarting
    /// its time-to-live.
    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
}

/// In-process cache with a fixed time-to-live for every entry.
#[derive(Clone)]
pub struct MokaPostCache {
    entries: Cache<String, String>,
    ttl: Duration,
}

impl MokaPostCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { entries, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl PostCache for MokaPostCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries.insert(key.to_owned(), value).await;
        Ok(())
    }
}
