//! Base asset-executor contract.
//!
//! Every concrete executor implements validation, cost estimation, and a
//! raw `invoke`; the provided [`AssetExecutor::execute`] composes the full
//! pipeline around `invoke`:
//!
//! 1. validate (failures are non-retryable and never reach the generator)
//! 2. cache lookup under a deterministic content hash of the action
//! 3. rate-limit acquisition, retried once after the limiter's hint
//! 4. generator invocation under exponential-backoff retry
//! 5. cache write and cost recording

use crate::ExecutionContext;
use giotto_core::{Action, AssetKind, AssetResult, CostEstimate};
use giotto_error::{ExecutorError, ExecutorErrorKind};
use giotto_rate_limit::ResourceClass;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_retry2::{Retry, RetryError};

/// Outcome of executor-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorValidation {
    /// Whether the action may be executed
    pub valid: bool,
    /// One message per violated rule
    pub errors: Vec<String>,
}

impl ExecutorValidation {
    /// A passing validation.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing validation with the collected messages.
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// Deterministic cache key for an action.
///
/// The action's JSON form is recursively rebuilt with keys sorted, so field
/// ordering never splits the cache, then hashed with SHA-256.
///
/// # Examples
///
/// ```
/// use giotto_core::Action;
/// use giotto_engine::cache_key;
///
/// let a: Action = serde_json::from_str(
///     r#"{"type":"play_cutscene","cutscene_id":"cs","id":"p"}"#).unwrap();
/// let b: Action = serde_json::from_str(
///     r#"{"id":"p","cutscene_id":"cs","type":"play_cutscene"}"#).unwrap();
/// assert_eq!(cache_key(&a).unwrap(), cache_key(&b).unwrap());
/// ```
pub fn cache_key(action: &Action) -> Result<String, ExecutorError> {
    let value = serde_json::to_value(action).map_err(|e| {
        ExecutorError::new(ExecutorErrorKind::Validation(format!(
            "action failed to serialize for cache keying: {}",
            e
        )))
    })?;
    let canonical = canonicalize(&value).to_string();

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Rebuild a JSON value with object keys sorted recursively.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Contract every concrete asset executor implements.
#[async_trait::async_trait]
pub trait AssetExecutor: Send + Sync {
    /// The artifact kind this executor produces.
    fn kind(&self) -> AssetKind;

    /// The action tag this executor handles.
    fn action_type(&self) -> &'static str;

    /// The metered resource class this executor draws on, if any.
    fn resource_class(&self) -> Option<ResourceClass>;

    /// Check an action before execution. Failures are never retried.
    fn validate(&self, action: &Action) -> ExecutorValidation;

    /// Predict the cost range of executing an action.
    fn estimate_cost(&self, action: &Action) -> CostEstimate;

    /// Billable model and unit count for a validated action.
    fn billing(&self, action: &Action) -> (String, f64);

    /// Raw execution: call the generator and store the artifact. The
    /// pipeline in [`AssetExecutor::execute`] wraps this with caching, rate
    /// limiting, and retry.
    async fn invoke(
        &self,
        id: &str,
        action: &Action,
        ctx: &ExecutionContext,
    ) -> Result<AssetResult, ExecutorError>;

    /// Execute an action through the full pipeline.
    async fn execute(
        &self,
        id: &str,
        action: &Action,
        ctx: &ExecutionContext,
    ) -> Result<AssetResult, ExecutorError> {
        // 1. Validate; a failure here must not reach the generator.
        let validation = self.validate(action);
        if !validation.valid {
            return Err(ExecutorError::new(ExecutorErrorKind::Validation(
                validation.errors.join("; "),
            )));
        }

        // 2. Cache lookup under the normalized content hash.
        let key = cache_key(action)?;
        {
            let mut cache = ctx.cache().lock().await;
            if let Some(entry) = cache.get(&key) {
                tracing::info!(id, key = %key, "Asset cache hit, skipping generation");
                let mut result = entry.value().clone();
                result.id = id.to_string();
                return Ok(result);
            }
        }

        // 3. Acquire a rate-limit slot; on exhaustion wait the hinted
        // backoff and retry acquisition once.
        if let Some(class) = self.resource_class() {
            if let Err(denied) = ctx.limiter().acquire(class) {
                let wait = denied
                    .retry_after()
                    .unwrap_or(std::time::Duration::from_millis(100));
                tracing::warn!(
                    id,
                    class = %class,
                    wait_ms = wait.as_millis() as u64,
                    "Rate limited, waiting before one more acquisition attempt"
                );
                tokio::time::sleep(wait).await;
                ctx.limiter().acquire(class).map_err(|e| {
                    ExecutorError::new(ExecutorErrorKind::Generation(e.to_string()))
                })?;
            }
        }

        // 4. Invoke the generator under the retry schedule.
        let attempts = AtomicUsize::new(0);
        let outcome = Retry::spawn(ctx.retry().backoff(), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                match self.invoke(id, action, ctx).await {
                    Ok(result) => Ok(result),
                    Err(e) if e.kind.is_retryable() => {
                        tracing::warn!(id, attempt, error = %e, "Transient generation failure, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        tracing::error!(id, attempt, error = %e, "Permanent generation failure");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await;

        let result = match outcome {
            Ok(result) => result,
            Err(e) if e.kind.is_retryable() => {
                // The schedule ran dry on a transient failure.
                return Err(ExecutorError::new(ExecutorErrorKind::RetriesExhausted {
                    attempts: attempts.load(Ordering::SeqCst),
                    last_error: e.kind.to_string(),
                }));
            }
            Err(e) => return Err(e),
        };

        // 5. Cache the result and record its cost.
        {
            let mut cache = ctx.cache().lock().await;
            cache.set(&key, result.clone(), None);
        }

        let (model, units) = self.billing(action);
        ctx.costs()
            .lock()
            .await
            .record(self.kind(), model, units, result.cost);

        Ok(result)
    }
}
