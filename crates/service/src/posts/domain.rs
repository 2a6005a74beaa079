use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single authored message.
///
/// `id` is the pagination key: ids must be unique and sort in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl Post {
    /// Fresh post stamped with the current time and a new id.
    pub fn new(author_id: impl Into<String>, text: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: new_post_id(),
            text: text.into(),
            author_id: author_id.into(),
            created_at: now,
            last_modified_at: now,
        }
    }

    /// Copy of this post carrying new text, as handed to `PostStorage::patch`.
    pub fn edited(&self, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self { text: text.into(), last_modified_at: at, ..self.clone() }
    }
}

/// Time-ordered UUIDv7 in its hyphenated form; lexical order follows creation order.
pub fn new_post_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current time truncated to milliseconds so it survives every backend unchanged.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// One page of an author's posts, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPosts {
    pub posts: Vec<Post>,
    /// Id of the first post of the following page; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}
