//! Execution engine and asset executors for the Giotto asset pipeline.
//!
//! This crate walks a compiled [`giotto_script::ActionGraph`] and executes
//! it against pluggable generation backends:
//!
//! - **Asset actions** dispatch through an [`ExecutorRegistry`] to the
//!   executor for their kind. Every executor composes the same pipeline:
//!   validate, consult the content-addressed cache, acquire a rate-limit
//!   slot, invoke the generator under an exponential-backoff retry loop,
//!   then store the result and record its cost.
//! - **Game actions** are not interpreted here; the engine emits a typed
//!   [`GameDirective`] marker for the downstream world-state interpreter.
//! - A failing action contributes an error to the batch result without
//!   blocking unrelated actions.
//!
//! # Example
//!
//! ```no_run
//! use giotto_engine::{ExecutionContext, ExecutionEngine, SimulatedGenerator};
//! use giotto_script::ScriptParser;
//! use giotto_storage::MemoryStorage;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = ScriptParser::new()
//!     .parse(r#"{"actions":[{"type":"asset_image","id":"bg","prompt":"ruins",
//!                 "size":"1024x768","model":"flux-schnell"}]}"#)
//!     .map_err(|errors| format!("{:?}", errors))?;
//!
//! let ctx = ExecutionContext::new(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(SimulatedGenerator::new()),
//! )?;
//! let engine = ExecutionEngine::standard();
//! let batch = engine.execute_batch(&graph, &ctx).await;
//! assert!(batch.success);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod context;
mod cutscene;
mod engine;
mod executor;
mod generator;
mod image;
mod registry;
mod simulated;
mod speech;

pub use batch::{ActionOutcome, BatchResult, ExecutedAction, ExecutionError, GameDirective};
pub use context::{ApiCredentials, ExecutionContext};
pub use cutscene::CutsceneExecutor;
pub use engine::ExecutionEngine;
pub use executor::{AssetExecutor, ExecutorValidation, cache_key};
pub use generator::{GeneratedMedia, ImageRequest, MediaGenerator, SpeechRequest};
pub use image::ImageExecutor;
pub use registry::ExecutorRegistry;
pub use simulated::SimulatedGenerator;
pub use speech::SpeechExecutor;
