//! Asset result caching for the Giotto asset pipeline.
//!
//! Generation backends are slow and billed per call, so executors cache
//! their results keyed by a deterministic hash of the normalized action.
//! A warm cache turns a repeated action into a lookup instead of a second
//! generator invocation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;

pub use cache::{AssetCache, AssetCacheConfig, AssetCacheConfigBuilder, CacheEntry};
