use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::cache::PostCache;
use super::domain::{Post, UserPosts};
use super::errors::StorageError;
use super::storage::PostStorage;

/// Namespace for post entries when the cache is shared with other data.
pub const DEFAULT_KEY_PREFIX: &str = "microblog:";

/// Cache-aside composite: an expiring cache in front of an authoritative store.
///
/// Writes go to the durable store first and reach the cache only after they
/// succeed, so the cache never holds a post the durable store lacks. A cache
/// failure other than a miss is returned to the caller instead of falling back
/// to the durable store. Entries written behind the cache's back stay stale
/// until they expire.
pub struct CachedPostStorage {
    durable: Arc<dyn PostStorage>,
    cache: Arc<dyn PostCache>,
    key_prefix: String,
}

impl CachedPostStorage {
    pub fn new(durable: Arc<dyn PostStorage>, cache: Arc<dyn PostCache>) -> Self {
        Self { durable, cache, key_prefix: DEFAULT_KEY_PREFIX.to_owned() }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn key(&self, post_id: &str) -> String {
        format!("{}{}", self.key_prefix, post_id)
    }

    async fn store(&self, post: &Post) -> Result<(), StorageError> {
        let raw = serde_json::to_string(post)?;
        self.cache.set(&self.key(&post.id), raw).await?;
        Ok(())
    }

    async fn restore(&self, post_id: &str) -> Result<Option<Post>, StorageError> {
        match self.cache.get(&self.key(post_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PostStorage for CachedPostStorage {
    #[instrument(level = "debug", skip(self, post), fields(post_id = %post.id, author_id = %post.author_id))]
    async fn add(&self, post: Post) -> Result<(), StorageError> {
        self.durable.add(post.clone()).await?;
        self.store(&post).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn get(&self, post_id: &str) -> Result<Post, StorageError> {
        if let Some(post) = self.restore(post_id).await? {
            debug!(event = "cache_hit", "post served from cache");
            return Ok(post);
        }
        debug!(event = "cache_miss", "reading through to durable store");
        let post = self.durable.get(post_id).await?;
        self.store(&post).await?;
        Ok(post)
    }

    async fn get_by_author(&self, author_id: &str, page: Option<&str>, size: usize) -> Result<UserPosts, StorageError> {
        self.durable.get_by_author(author_id, page, size).await
    }

    #[instrument(level = "debug", skip(self, post), fields(post_id = %post.id))]
    async fn patch(&self, post: Post) -> Result<(), StorageError> {
        // identity fields come from the stored row; patch ignores the argument's
        let stored = self.durable.get(&post.id).await?.edited(post.text.as_str(), post.last_modified_at);
        self.durable.patch(post).await?;
        self.store(&stored).await
    }
}
