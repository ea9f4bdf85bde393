//! Giotto - Action Script Compiler and Asset Pipeline
//!
//! Giotto turns a declarative, JSON-encoded script of actions (asset
//! generation requests plus game-state directives, typically produced by an
//! LLM) into a validated dependency graph, then executes that graph against
//! pluggable asset-generation backends with caching, rate limiting, retry,
//! and cost accounting.
//!
//! # Features
//!
//! - **Recursive action DSL**: ten tagged action variants, nesting through
//!   conditions and player choices
//! - **Two-phase validation**: schema errors with dotted field paths, then
//!   semantic checks with typo suggestions, all collected in one pass
//! - **Dependency scheduling**: cycle detection with full cycle paths and a
//!   topological execution order
//! - **Executor pipeline**: content-addressed caching, per-resource-class
//!   rate limiting, and exponential-backoff retry around every generator
//!   call
//! - **Cost accounting**: per-type/per-model ledger with batch totals and
//!   pre-execution estimates
//!
//! # Quick Start
//!
//! ```no_run
//! use giotto::{ExecutionContext, ExecutionEngine, ScriptParser, SimulatedGenerator};
//! use giotto::MemoryStorage;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let graph = ScriptParser::new()
//!         .parse(r#"{"actions":[
//!             {"type":"asset_image","id":"bg","prompt":"a ruined aqueduct",
//!              "size":"1024x768","model":"flux-schnell"}
//!         ]}"#)
//!         .map_err(|errors| format!("parse failed: {:?}", errors))?;
//!
//!     let ctx = ExecutionContext::new(
//!         Arc::new(MemoryStorage::new()),
//!         Arc::new(SimulatedGenerator::new()),
//!     )?;
//!     let batch = ExecutionEngine::standard().execute_batch(&graph, &ctx).await;
//!     println!("generated {} assets for ${:.4}", batch.assets_generated.len(), batch.total_cost);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Giotto is organized as a workspace with focused crates:
//!
//! - `giotto_core` - Action DSL data types, asset results, cost ledger
//! - `giotto_error` - Error types
//! - `giotto_script` - Schema/semantic validation, dependency resolution,
//!   graph construction
//! - `giotto_cache` - TTL/LRU asset result cache
//! - `giotto_rate_limit` - Per-resource-class admission limits and retry
//!   policy
//! - `giotto_storage` - Content-addressable asset storage
//! - `giotto_engine` - Execution engine and the image/speech/cutscene
//!   executors
//!
//! This crate (`giotto`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use giotto_cache::*;
pub use giotto_core::*;
pub use giotto_engine::*;
pub use giotto_error::*;
pub use giotto_rate_limit::*;
pub use giotto_script::*;
pub use giotto_storage::*;

mod observability;

pub use observability::{ObservabilityConfig, init_observability, init_observability_with_config};
