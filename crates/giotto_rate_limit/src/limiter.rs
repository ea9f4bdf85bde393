//! Per-resource-class admission gate.

use crate::{ClassLimit, GiottoConfig, RateLimitError, RateLimitErrorKind, ResourceClass};
use governor::clock::{Clock, DefaultClock};
use governor::{Quota, RateLimiter};
use std::collections::HashMap;
use std::num::NonZeroU32;
use strum::IntoEnumIterator;

type DirectLimiter =
    RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, DefaultClock>;

/// Admission gate bounding request rates per [`ResourceClass`].
///
/// `acquire` is non-suspending: a denied acquisition returns a rate-limit
/// signal carrying a retry-after hint, and the caller decides whether to
/// wait. The executor layer waits the hinted backoff and retries acquisition
/// once before failing the action.
///
/// # Example
///
/// ```
/// use giotto_rate_limit::{ClassLimit, ResourceClass, ResourceLimiter};
///
/// let limiter = ResourceLimiter::with_limit(
///     ResourceClass::ImageGeneration,
///     ClassLimit { rpm: 60, burst: 2 },
/// ).unwrap();
///
/// assert!(limiter.acquire(ResourceClass::ImageGeneration).is_ok());
/// assert!(limiter.acquire(ResourceClass::ImageGeneration).is_ok());
/// let denied = limiter.acquire(ResourceClass::ImageGeneration).unwrap_err();
/// assert!(denied.retry_after().is_some());
/// ```
#[derive(Debug)]
pub struct ResourceLimiter {
    clock: DefaultClock,
    limiters: HashMap<ResourceClass, DirectLimiter>,
}

impl ResourceLimiter {
    /// Build a limiter covering every resource class from configuration.
    ///
    /// Classes absent from the configuration get a built-in default of
    /// 30 requests per minute with a burst of 5.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured limit is zero.
    #[tracing::instrument(skip(config))]
    pub fn from_config(config: &GiottoConfig) -> Result<Self, RateLimitError> {
        let mut limiters = HashMap::new();
        for class in ResourceClass::iter() {
            let limit = config
                .limit_for(class)
                .unwrap_or(ClassLimit { rpm: 30, burst: 5 });
            limiters.insert(class, Self::build_limiter(class, limit)?);
            tracing::debug!(class = %class, rpm = limit.rpm, burst = limit.burst, "Configured limiter");
        }
        Ok(Self {
            clock: DefaultClock::default(),
            limiters,
        })
    }

    /// Build a limiter for a single class, leaving other classes unlimited
    /// by a generous default. Intended for tests and small tools.
    pub fn with_limit(class: ResourceClass, limit: ClassLimit) -> Result<Self, RateLimitError> {
        let mut config = GiottoConfig::default();
        config
            .rate_limits
            .insert(class.to_string(), limit);
        for other in ResourceClass::iter() {
            config
                .rate_limits
                .entry(other.to_string())
                .or_insert(ClassLimit {
                    rpm: 6000,
                    burst: 100,
                });
        }
        Self::from_config(&config)
    }

    fn build_limiter(
        class: ResourceClass,
        limit: ClassLimit,
    ) -> Result<DirectLimiter, RateLimitError> {
        let rpm = NonZeroU32::new(limit.rpm).ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::Config(format!(
                "rpm for {} must be nonzero",
                class
            )))
        })?;
        let burst = NonZeroU32::new(limit.burst).ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::Config(format!(
                "burst for {} must be nonzero",
                class
            )))
        })?;
        Ok(RateLimiter::direct(
            Quota::per_minute(rpm).allow_burst(burst),
        ))
    }

    /// Acquire an admission slot for a resource class.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitErrorKind::Exhausted`] with a retry-after hint when
    /// the class is out of slots, or [`RateLimitErrorKind::UnknownResource`]
    /// when no limiter covers the class.
    #[tracing::instrument(skip(self))]
    pub fn acquire(&self, class: ResourceClass) -> Result<(), RateLimitError> {
        let limiter = self.limiters.get(&class).ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::UnknownResource(class.to_string()))
        })?;

        match limiter.check() {
            Ok(_) => {
                tracing::debug!(class = %class, "Acquired rate limit slot");
                Ok(())
            }
            Err(not_until) => {
                let retry_after = not_until.wait_time_from(self.clock.now());
                tracing::warn!(
                    class = %class,
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Rate limit exhausted"
                );
                Err(RateLimitError::new(RateLimitErrorKind::Exhausted {
                    resource: class.to_string(),
                    retry_after,
                }))
            }
        }
    }
}
