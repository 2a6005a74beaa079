use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tracing::info;

use service::pagination::PageQuery;
use service::posts::domain::now_millis;
use service::posts::{Post, UserPosts};

use super::AppState;
use crate::errors::ApiError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "System-Design-User-Id";

#[derive(Debug, Deserialize)]
pub struct PostText {
    pub text: String,
}

fn is_valid_user_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Caller identity from `System-Design-User-Id`, or 401.
pub fn author_from(headers: &HeaderMap) -> Result<String, ApiError> {
    let id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !is_valid_user_id(id) {
        return Err(ApiError::unauthorized("user token is missing from the request or malformed"));
    }
    Ok(id.to_owned())
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PostText>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let Json(body) = payload?;
    let author = author_from(&headers)?;

    let post = Post::new(author, body.text);
    state.storage.add(post.clone()).await?;
    info!(post_id = %post.id, author_id = %post.author_id, event = "post_created", "post created");
    Ok(Json(post))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.storage.get(&post_id).await?))
}

pub async fn patch_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<PostText>, JsonRejection>,
) -> Result<Json<Post>, ApiError> {
    let author = author_from(&headers)?;
    let Json(body) = payload?;

    let current = state.storage.get(&post_id).await?;
    if current.author_id != author {
        return Err(ApiError::forbidden("only the author can edit a post"));
    }

    let edited = current.edited(body.text, now_millis());
    state.storage.patch(edited.clone()).await?;
    info!(post_id = %edited.id, author_id = %author, event = "post_edited", "post edited");
    Ok(Json(edited))
}

pub async fn list_user_posts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserPosts>, ApiError> {
    let size = query.size()?;
    let page = state
        .storage
        .get_by_author(&user_id, query.token(), size)
        .await?;
    Ok(Json(page))
}
