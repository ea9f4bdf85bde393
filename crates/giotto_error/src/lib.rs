//! Error types for the Giotto asset pipeline.
//!
//! This crate provides the foundation error types used throughout the Giotto
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use giotto_error::{GiottoResult, ConfigError};
//!
//! fn load_settings() -> GiottoResult<String> {
//!     Err(ConfigError::new("Missing rate limit table"))?
//! }
//!
//! match load_settings() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod executor;
mod generator;
mod json;
mod script;
mod storage;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{GiottoError, GiottoErrorKind, GiottoResult};
pub use executor::{ExecutorError, ExecutorErrorKind};
pub use generator::{GeneratorError, GeneratorErrorKind, RetryableError};
pub use json::JsonError;
pub use script::{ScriptError, ScriptErrorKind};
pub use storage::{StorageError, StorageErrorKind};
