//! Post storage for the microblog service.
//! - One `PostStorage` contract, shared by every backend.
//! - In-memory, sea-orm and cache-aside implementations under `posts`.
//! - Page-size and page-splitting helpers in `pagination`.

pub mod pagination;
pub mod posts;
#[cfg(test)]
pub mod test_support;
