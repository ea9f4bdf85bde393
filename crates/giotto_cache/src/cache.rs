//! Asset result cache implementation.

use derive_getters::Getters;
use giotto_core::AssetResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    value: AssetResult,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.created_at.elapsed())
    }
}

/// Configuration for the asset cache.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct AssetCacheConfig {
    /// Default TTL for cached entries (seconds)
    #[serde(default = "default_ttl")]
    default_ttl: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    3600 // 1 hour
}

fn default_max_size() -> usize {
    1000
}

fn default_enabled() -> bool {
    true
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

/// Cache for generated asset results.
///
/// Stores asset results with TTL-based expiration. Keys are the
/// content-addressed action hashes computed by the executor layer, so two
/// actions with identical normalized content share one entry.
///
/// # Example
///
/// ```
/// use giotto_cache::{AssetCache, AssetCacheConfig};
/// use giotto_core::{AssetKind, AssetResult};
/// use std::collections::HashMap;
///
/// let mut cache = AssetCache::new(AssetCacheConfig::default());
///
/// let result = AssetResult {
///     id: "bg".to_string(),
///     url: "memory://images/abc123".to_string(),
///     kind: AssetKind::Image,
///     metadata: HashMap::new(),
///     cost: 0.0,
///     duration_seconds: None,
/// };
///
/// cache.set("abc123", result.clone(), Some(60));
/// assert_eq!(cache.get("abc123").map(|e| e.value().id.clone()), Some("bg".to_string()));
/// ```
pub struct AssetCache {
    config: AssetCacheConfig,
    entries: HashMap<String, CacheEntry>,
    access_order: Vec<String>,
}

impl AssetCache {
    /// Create a new asset cache with configuration.
    pub fn new(config: AssetCacheConfig) -> Self {
        tracing::debug!(
            default_ttl = config.default_ttl,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new AssetCache"
        );
        Self {
            config,
            entries: HashMap::new(),
            access_order: Vec::new(),
        }
    }

    /// Insert an asset result into the cache.
    ///
    /// # Arguments
    ///
    /// * `key` - Content-addressed action hash
    /// * `value` - Asset result to cache
    /// * `ttl_seconds` - TTL in seconds (uses default if None)
    #[tracing::instrument(
        skip(self, key, value),
        fields(
            key = %key.as_ref(),
            ttl_seconds,
            cache_size = self.entries.len()
        )
    )]
    pub fn set(&mut self, key: impl AsRef<str>, value: AssetResult, ttl_seconds: Option<u64>) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        let key = key.as_ref().to_string();
        let ttl = Duration::from_secs(ttl_seconds.unwrap_or(self.config.default_ttl));

        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl,
        };

        // Evict if at capacity
        if self.entries.len() >= self.config.max_size && !self.entries.contains_key(&key) {
            self.evict_lru();
        }

        // Track access order for LRU
        if let Some(pos) = self.access_order.iter().position(|k| k == &key) {
            self.access_order.remove(pos);
        }
        self.access_order.push(key.clone());

        tracing::debug!(
            replaced = self.entries.contains_key(&key),
            ttl = ?ttl,
            "Inserted entry into cache"
        );

        self.entries.insert(key, entry);
    }

    /// Get a cached asset result.
    ///
    /// Returns None if:
    /// - Entry doesn't exist
    /// - Entry is expired
    /// - Cache is disabled
    #[tracing::instrument(
        skip(self, key),
        fields(
            key = %key.as_ref(),
            cache_size = self.entries.len()
        )
    )]
    pub fn get(&mut self, key: impl AsRef<str>) -> Option<&CacheEntry> {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, returning None");
            return None;
        }

        let key = key.as_ref();

        // Check if entry exists and is not expired
        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            tracing::debug!("Cache entry expired, removing");
            self.entries.remove(key);
            if let Some(pos) = self.access_order.iter().position(|k| k == key) {
                self.access_order.remove(pos);
            }
            return None;
        }

        // Update access order for LRU
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            let key_clone = self.access_order.remove(pos);
            self.access_order.push(key_clone);
        }

        tracing::debug!(
            time_remaining = ?entry.time_remaining(),
            "Cache hit"
        );

        self.entries.get(key)
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();

        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired();
            if !keep
                && let Some(pos) = self.access_order.iter().position(|k| k == key)
            {
                self.access_order.remove(pos);
            }
            keep
        });

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(removed, remaining = self.entries.len(), "Cleaned up expired cache entries");
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.access_order.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict least recently used entry.
    fn evict_lru(&mut self) {
        if let Some(key) = self.access_order.first().cloned() {
            tracing::debug!(key = %key, "Evicting LRU entry");
            self.entries.remove(&key);
            self.access_order.remove(0);
        }
    }
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new(AssetCacheConfig::default())
    }
}
