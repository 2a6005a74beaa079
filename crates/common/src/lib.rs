//! Shared building blocks for the microblog crates: response types that are
//! not tied to a storage backend and the tracing bootstrap.

pub mod types;
pub mod utils;
