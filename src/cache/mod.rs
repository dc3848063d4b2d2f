//! Response caching keyed by exact input text, with optional LRU eviction.

pub mod response_cache;

pub use response_cache::{CacheStats, ResponseCache};
