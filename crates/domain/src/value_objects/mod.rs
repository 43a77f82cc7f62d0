//! Value Objects - Immutable, identity-less domain primitives

mod cache_key;
mod fragment;
mod prompt;

pub use cache_key::{CacheKey, CacheNamespace};
pub use fragment::Fragment;
pub use prompt::Prompt;
