//! Caching layer for user lookups.
//!
//! Provides a [`CacheService`] substrate trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache, shareable between processes
//! - [`MemoryCache`] - In-process cache for single-node setups and tests
//!
//! and [`CachingUserRepository`], the cache-aside decorator bound in front of
//! the PostgreSQL user repository. Key derivation lives in [`keys`].

mod cached_user_repository;
pub mod keys;
mod memory_cache;
mod redis_cache;
mod service;

pub use cached_user_repository::CachingUserRepository;
pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
