//! Executor registry.

use crate::{AssetExecutor, CutsceneExecutor, ImageExecutor, SpeechExecutor};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps action tags to the executors that handle them.
///
/// Registration is explicit and centralized; registries are plain values
/// constructed where they are used, so tests can build isolated instances.
///
/// # Example
///
/// ```
/// use giotto_engine::{ExecutorRegistry, ImageExecutor};
/// use std::sync::Arc;
///
/// let mut registry = ExecutorRegistry::new();
/// registry.register(Arc::new(ImageExecutor::new()));
/// assert!(registry.get("asset_image").is_some());
/// assert_eq!(registry.list(), vec!["asset_image"]);
/// ```
#[derive(Default)]
pub struct ExecutorRegistry {
    executors: HashMap<&'static str, Arc<dyn AssetExecutor>>,
}

impl ExecutorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the three standard executors (image, speech,
    /// cutscene assembly).
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ImageExecutor::new()));
        registry.register(Arc::new(SpeechExecutor::new()));
        registry.register(Arc::new(CutsceneExecutor::new()));
        registry
    }

    /// Register an executor under its action tag, replacing any previous
    /// registration for that tag.
    pub fn register(&mut self, executor: Arc<dyn AssetExecutor>) {
        tracing::debug!(action_type = executor.action_type(), "Registering executor");
        self.executors.insert(executor.action_type(), executor);
    }

    /// Look up the executor for an action tag.
    pub fn get(&self, action_type: &str) -> Option<&Arc<dyn AssetExecutor>> {
        self.executors.get(action_type)
    }

    /// Registered action tags, sorted.
    pub fn list(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.executors.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered executors.
    pub fn len(&self) -> usize {
        self.executors.len()
    }

    /// Whether no executors are registered.
    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}
