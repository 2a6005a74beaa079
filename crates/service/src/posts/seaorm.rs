use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

use models::post;

use super::domain::{Post, UserPosts};
use super::errors::StorageError;
use super::storage::PostStorage;
use crate::pagination::split_page;

/// Database-backed post storage.
///
/// Expects the schema from the `migration` crate, including the
/// `(author_id, id DESC)` index that pagination relies on.
pub struct SeaOrmPostStorage {
    db: DatabaseConnection,
}

impl SeaOrmPostStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<post::Model> for Post {
    fn from(m: post::Model) -> Self {
        Post {
            id: m.id,
            text: m.text,
            author_id: m.author_id,
            created_at: m.created_at,
            last_modified_at: m.last_modified_at,
        }
    }
}

impl From<Post> for post::Model {
    fn from(p: Post) -> Self {
        post::Model {
            id: p.id,
            text: p.text,
            author_id: p.author_id,
            created_at: p.created_at,
            last_modified_at: p.last_modified_at,
        }
    }
}

#[async_trait]
impl PostStorage for SeaOrmPostStorage {
    #[instrument(level = "debug", skip(self, post), fields(post_id = %post.id, author_id = %post.author_id))]
    async fn add(&self, post: Post) -> Result<(), StorageError> {
        if !post::insert_if_absent(&self.db, post.into()).await? {
            return Err(StorageError::Collision);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn get(&self, post_id: &str) -> Result<Post, StorageError> {
        post::find(&self.db, post_id)
            .await?
            .map(Post::from)
            .ok_or(StorageError::PostNotFound)
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_by_author(&self, author_id: &str, page: Option<&str>, size: usize) -> Result<UserPosts, StorageError> {
        if let Some(token) = page {
            if !post::author_has_posts(&self.db, author_id).await? {
                return Err(StorageError::UserNotFound);
            }
            let anchor = post::find(&self.db, token).await?.ok_or(StorageError::WrongPage)?;
            if anchor.author_id != author_id {
                return Err(StorageError::WrongAuthor);
            }
        }

        let rows = post::page_by_author(&self.db, author_id, page, size as u64 + 1).await?;
        let page = split_page(rows.into_iter().map(Post::from).collect(), size);
        debug!(returned = page.posts.len(), has_next = page.next_page.is_some(), "page served");
        Ok(page)
    }

    #[instrument(level = "debug", skip(self, post), fields(post_id = %post.id))]
    async fn patch(&self, post: Post) -> Result<(), StorageError> {
        let touched = post::update_text(&self.db, &post.id, &post.text, post.last_modified_at).await?;
        if touched == 0 {
            return Err(StorageError::PostNotFound);
        }
        Ok(())
    }
}
