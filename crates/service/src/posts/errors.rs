use thiserror::Error;

use models::errors::ModelError;

/// Failures of the cache client other than "key not present".
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Errors every `PostStorage` backend reports identically.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("post id is already taken")]
    Collision,
    #[error("post not found")]
    PostNotFound,
    #[error("user has no posts")]
    UserNotFound,
    #[error("page token does not match any post")]
    WrongPage,
    #[error("page token belongs to another author")]
    WrongAuthor,
    #[error("database error: {0}")]
    Db(String),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<ModelError> for StorageError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Db(msg) => StorageError::Db(msg),
        }
    }
}

impl StorageError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            StorageError::Collision => 2001,
            StorageError::PostNotFound => 2002,
            StorageError::UserNotFound => 2003,
            StorageError::WrongPage => 2004,
            StorageError::WrongAuthor => 2005,
            StorageError::Db(_) => 2101,
            StorageError::Cache(_) => 2102,
            StorageError::Codec(_) => 2103,
        }
    }

    /// Backend failures, as opposed to outcomes of the request itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, StorageError::Db(_) | StorageError::Cache(_) | StorageError::Codec(_))
    }
}
