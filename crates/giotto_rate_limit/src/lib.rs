//! Rate limiting and retry policy for the Giotto asset pipeline.
//!
//! Generation backends meter requests per resource class, so the executor
//! layer acquires an admission slot before every external call. This crate
//! provides:
//!
//! - [`ResourceClass`]: the metered resource classes
//! - [`ResourceLimiter`]: a per-class admission gate with retry-after hints
//! - [`GiottoConfig`]: TOML configuration with bundled defaults and user
//!   overrides
//! - [`RetryPolicy`]: the exponential backoff schedule executors retry with

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod limiter;
mod resource;
mod retry;

pub use config::{ClassLimit, GiottoConfig, RetryConfig};
pub use error::{RateLimitError, RateLimitErrorKind};
pub use limiter::ResourceLimiter;
pub use resource::ResourceClass;
pub use retry::RetryPolicy;
