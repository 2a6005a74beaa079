use async_trait::async_trait;

use super::domain::{Post, UserPosts};
use super::errors::StorageError;

/// Contract shared by all post backends.
///
/// Every method is cancel-safe with respect to the caller: dropping the
/// returned future abandons the outstanding database or cache round-trip.
#[async_trait]
pub trait PostStorage: Send + Sync {
    /// Store a new post. `Collision` if the id is taken; nothing is written then.
    async fn add(&self, post: Post) -> Result<(), StorageError>;

    /// Fetch a post by id, or `PostNotFound`.
    async fn get(&self, post_id: &str) -> Result<Post, StorageError>;

    /// One page of `author_id`'s posts, newest first.
    ///
    /// `page` is a `next_page` token from an earlier call; the page starts at
    /// that post. `size` must be positive. With a token the checks run in this
    /// order: `UserNotFound` (author has no posts), `WrongPage` (no such post),
    /// `WrongAuthor` (post written by someone else). Without a token an author
    /// with no posts gets an empty page.
    async fn get_by_author(&self, author_id: &str, page: Option<&str>, size: usize) -> Result<UserPosts, StorageError>;

    /// Replace `text` and `last_modified_at` of an existing post.
    ///
    /// Other fields of `post` are ignored. `PostNotFound` if the id is unknown;
    /// patch never creates. Ownership is checked by the caller.
    async fn patch(&self, post: Post) -> Result<(), StorageError>;
}
