//! Caching layer for registry lookups.
//!
//! Provides [`LoadingCache`], an in-process read-through cache with
//! expire-after-write and refresh-ahead, fed by a [`CacheLoader`]. Each
//! registry owns one instance, built once at startup from a [`CachePolicy`].

mod loading_cache;

pub use loading_cache::{CacheLoader, CachePolicy, LoadingCache};
