//! Shared execution context for one batch.

use crate::MediaGenerator;
use giotto_cache::{AssetCache, AssetCacheConfig};
use giotto_core::CostTracker;
use giotto_error::GiottoResult;
use giotto_rate_limit::{GiottoConfig, ResourceLimiter, RetryPolicy};
use giotto_storage::AssetStorage;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Credential material handed to generation backends.
///
/// The simulated backend ignores these; a real backend would not.
#[derive(Debug, Clone, Default)]
pub struct ApiCredentials {
    /// API key for the image generation backend
    pub image_api_key: Option<String>,
    /// API key for the speech synthesis backend
    pub tts_api_key: Option<String>,
}

/// Services shared by every executor during one batch.
///
/// The context owns the mutable cost ledger for the duration of the batch;
/// the storage, cache, and rate limiter are injected, shared services.
/// There is exactly one batch walker, so the tokio mutexes are held only
/// across individual cache and ledger operations, never across awaits.
pub struct ExecutionContext {
    credentials: ApiCredentials,
    storage: Arc<dyn AssetStorage>,
    generator: Arc<dyn MediaGenerator>,
    cache: Arc<Mutex<AssetCache>>,
    limiter: Arc<ResourceLimiter>,
    costs: Arc<Mutex<CostTracker>>,
    retry: RetryPolicy,
}

impl ExecutionContext {
    /// Create a context from storage and a generation backend, with
    /// built-in default limits, cache sizing, and retry schedule. Use
    /// [`ExecutionContext::from_config`] to honor `giotto.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default rate limit configuration is invalid.
    pub fn new(
        storage: Arc<dyn AssetStorage>,
        generator: Arc<dyn MediaGenerator>,
    ) -> GiottoResult<Self> {
        Self::from_config(&GiottoConfig::default(), storage, generator)
    }

    /// Create a context from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured rate limits are invalid.
    #[tracing::instrument(skip_all)]
    pub fn from_config(
        config: &GiottoConfig,
        storage: Arc<dyn AssetStorage>,
        generator: Arc<dyn MediaGenerator>,
    ) -> GiottoResult<Self> {
        let limiter = ResourceLimiter::from_config(config)
            .map_err(|e| giotto_error::ConfigError::new(e.to_string()))?;
        let cache_config = config.cache.clone().unwrap_or_default();

        Ok(Self {
            credentials: ApiCredentials::default(),
            storage,
            generator,
            cache: Arc::new(Mutex::new(AssetCache::new(cache_config))),
            limiter: Arc::new(limiter),
            costs: Arc::new(Mutex::new(CostTracker::default())),
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    /// Replace the credential material.
    pub fn with_credentials(mut self, credentials: ApiCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Replace the cache, e.g. to share one across batches.
    pub fn with_cache(mut self, cache: Arc<Mutex<AssetCache>>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the cache configuration.
    pub fn with_cache_config(mut self, config: AssetCacheConfig) -> Self {
        self.cache = Arc::new(Mutex::new(AssetCache::new(config)));
        self
    }

    /// Replace the rate limiter.
    pub fn with_limiter(mut self, limiter: Arc<ResourceLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Credential material for generation backends.
    pub fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    /// The asset storage backend.
    pub fn storage(&self) -> &Arc<dyn AssetStorage> {
        &self.storage
    }

    /// The generation backend.
    pub fn generator(&self) -> &Arc<dyn MediaGenerator> {
        &self.generator
    }

    /// The shared asset cache.
    pub fn cache(&self) -> &Arc<Mutex<AssetCache>> {
        &self.cache
    }

    /// The per-resource-class rate limiter.
    pub fn limiter(&self) -> &Arc<ResourceLimiter> {
        &self.limiter
    }

    /// The batch cost ledger.
    pub fn costs(&self) -> &Arc<Mutex<CostTracker>> {
        &self.costs
    }

    /// The retry schedule for transient generation failures.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}
