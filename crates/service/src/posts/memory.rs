use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument};

use super::domain::{Post, UserPosts};
use super::errors::StorageError;
use super::storage::PostStorage;

#[derive(Default)]
struct Posts {
    by_id: HashMap<String, Post>,
    // ids per author sorted ascending, oldest first
    by_author: HashMap<String, Vec<String>>,
}

/// Process-local post storage.
///
/// Reads share the lock, `add` and `patch` take it exclusively. Issued page
/// tokens are remembered with the offset they point at, so walking a long
/// history costs O(page) per call. Any other valid token is found by binary
/// search over the author's sorted ids.
///
/// # Examples
/// ```
/// use service::posts::{InMemoryPostStorage, Post, PostStorage};
/// let store = InMemoryPostStorage::new();
/// let post = Post::new("chico", "Hola, guapo");
/// tokio_test::block_on(store.add(post.clone())).unwrap();
/// let page = tokio_test::block_on(store.get_by_author("chico", None, 10)).unwrap();
/// assert_eq!(page.posts, vec![post]);
/// assert!(page.next_page.is_none());
/// ```
#[derive(Default)]
pub struct InMemoryPostStorage {
    posts: RwLock<Posts>,
    // an id landing before the tail of a sequence shifts the offsets after it;
    // `add` drops those entries while holding the write lock
    page_offsets: Mutex<HashMap<String, usize>>,
}

impl InMemoryPostStorage {
    pub fn new() -> Self {
        Self::default()
    }

    async fn offset_of(&self, token: &str, ids: &[String]) -> Option<usize> {
        let mut offsets = self.page_offsets.lock().await;
        if let Some(&offset) = offsets.get(token) {
            return Some(offset);
        }
        let offset = ids.binary_search_by(|id| id.as_str().cmp(token)).ok()?;
        offsets.insert(token.to_owned(), offset);
        Some(offset)
    }
}

#[async_trait]
impl PostStorage for InMemoryPostStorage {
    #[instrument(level = "debug", skip(self, post), fields(post_id = %post.id, author_id = %post.author_id))]
    async fn add(&self, post: Post) -> Result<(), StorageError> {
        let mut posts = self.posts.write().await;
        if posts.by_id.contains_key(&post.id) {
            return Err(StorageError::Collision);
        }
        let ids = posts.by_author.entry(post.author_id.clone()).or_default();
        let at = ids.partition_point(|id| id < &post.id);
        ids.insert(at, post.id.clone());
        if at + 1 < ids.len() {
            debug!(offset = at, "post inserted before newer ids");
            let mut offsets = self.page_offsets.lock().await;
            for shifted in &ids[at + 1..] {
                offsets.remove(shifted);
            }
        }
        posts.by_id.insert(post.id.clone(), post);
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn get(&self, post_id: &str) -> Result<Post, StorageError> {
        let posts = self.posts.read().await;
        posts.by_id.get(post_id).cloned().ok_or(StorageError::PostNotFound)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_by_author(&self, author_id: &str, page: Option<&str>, size: usize) -> Result<UserPosts, StorageError> {
        let posts = self.posts.read().await;
        let ids = match posts.by_author.get(author_id) {
            Some(ids) if !ids.is_empty() => ids,
            _ if page.is_none() => return Ok(UserPosts::default()),
            _ => return Err(StorageError::UserNotFound),
        };

        let start = match page {
            None => ids.len() - 1,
            Some(token) => {
                let anchor = posts.by_id.get(token).ok_or(StorageError::WrongPage)?;
                if anchor.author_id != author_id {
                    return Err(StorageError::WrongAuthor);
                }
                self.offset_of(token, ids).await.ok_or(StorageError::WrongPage)?
            }
        };

        let page_posts: Vec<Post> = ids[..=start]
            .iter()
            .rev()
            .take(size)
            .filter_map(|id| posts.by_id.get(id).cloned())
            .collect();

        let next_page = if start >= size {
            let next = start - size;
            let token = ids[next].clone();
            self.page_offsets.lock().await.insert(token.clone(), next);
            Some(token)
        } else {
            None
        };

        debug!(returned = page_posts.len(), has_next = next_page.is_some(), "page served");
        Ok(UserPosts { posts: page_posts, next_page })
    }

    #[instrument(level = "debug", skip(self, post), fields(post_id = %post.id))]
    async fn patch(&self, post: Post) -> Result<(), StorageError> {
        let mut posts = self.posts.write().await;
        let stored = posts.by_id.get_mut(&post.id).ok_or(StorageError::PostNotFound)?;
        stored.text = post.text;
        stored.last_modified_at = post.last_modified_at;
        Ok(())
    }
}
