//! Pagination utilities for post listings
//!
//! Provides `PageQuery` to normalize caller input and `split_page` to turn an
//! over-fetched slice into a `UserPosts` page.

use serde::Deserialize;
use thiserror::Error;

use crate::posts::domain::{Post, UserPosts};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MIN_PAGE_SIZE: usize = 1;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("page size must be an integer between 1 and 100, got `{0}`")]
pub struct InvalidPageSize(pub String);

/// Listing parameters as received from a caller
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageQuery {
    /// continuation token; empty means "first page"
    #[serde(default)]
    pub page: Option<String>,
    /// raw page size
    #[serde(default)]
    pub size: Option<String>,
}

impl PageQuery {
    pub fn token(&self) -> Option<&str> {
        self.page.as_deref().filter(|p| !p.is_empty())
    }

    /// Parsed size, defaulting when absent and rejecting out-of-range values
    pub fn size(&self) -> Result<usize, InvalidPageSize> {
        let Some(raw) = self.size.as_deref() else { return Ok(DEFAULT_PAGE_SIZE) };
        match raw.trim().parse::<usize>() {
            Ok(n) if (MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&n) => Ok(n),
            _ => Err(InvalidPageSize(raw.to_string())),
        }
    }
}

/// Cut a newest-first slice fetched with `size + 1` rows into a page.
///
/// The extra row, if present, is not returned: its id becomes `next_page`.
pub fn split_page(mut posts: Vec<Post>, size: usize) -> UserPosts {
    let next_page = if posts.len() > size {
        posts.truncate(size + 1);
        posts.pop().map(|p| p.id)
    } else {
        None
    };
    UserPosts { posts, next_page }
}
