//! Posts: domain types, the storage contract, and its backends.
//!
//! The HTTP layer holds an `Arc<dyn PostStorage>` and never learns which
//! backend it talks to; every backend reports the same `StorageError`s.

pub mod cache;
pub mod cached;
pub mod domain;
pub mod errors;
pub mod memory;
pub mod seaorm;
pub mod storage;

#[cfg(test)]
mod contract_tests;

pub use cache::{MokaPostCache, PostCache};
pub use cached::CachedPostStorage;
pub use domain::{Post, UserPosts};
pub use errors::{CacheError, StorageError};
pub use memory::InMemoryPostStorage;
pub use seaorm::SeaOrmPostStorage;
pub use storage::PostStorage;
