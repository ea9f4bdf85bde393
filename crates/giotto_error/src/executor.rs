//! Asset executor error types.

use crate::GeneratorError;

/// Specific error conditions for asset executors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExecutorErrorKind {
    /// Action failed executor validation. Never retried.
    #[display("Action validation failed: {}", _0)]
    Validation(String),
    /// Referenced assets are missing from storage. Never retried.
    #[display("Missing assets: {}", _0)]
    MissingAssets(String),
    /// No executor registered for the action kind
    #[display("No executor registered for action kind '{}'", _0)]
    UnknownKind(String),
    /// Backend rejected the request outright. Never retried.
    #[display("Generation request rejected: {}", _0)]
    Rejected(String),
    /// Generation failed on a single attempt
    #[display("Generation failed: {}", _0)]
    Generation(String),
    /// All retry attempts were exhausted
    #[display("Generation failed after {} attempts: {}", attempts, last_error)]
    RetriesExhausted {
        /// Number of attempts made, including the first
        attempts: usize,
        /// Message from the final underlying failure
        last_error: String,
    },
}

impl ExecutorErrorKind {
    /// Check if this error type should be retried.
    ///
    /// Validation and missing-reference failures are deterministic and are
    /// never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecutorErrorKind::Generation(_))
    }
}

/// Asset executor error with location tracking.
///
/// # Examples
///
/// ```
/// use giotto_error::{ExecutorError, ExecutorErrorKind};
///
/// let err = ExecutorError::new(ExecutorErrorKind::RetriesExhausted {
///     attempts: 3,
///     last_error: "backend unavailable".to_string(),
/// });
/// assert!(format!("{}", err).contains("after 3 attempts"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Executor Error: {} at line {} in {}", kind, line, file)]
pub struct ExecutorError {
    /// The specific error condition
    pub kind: ExecutorErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExecutorError {
    /// Create a new ExecutorError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExecutorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<GeneratorError> for ExecutorError {
    #[track_caller]
    fn from(err: GeneratorError) -> Self {
        if err.kind.is_retryable() {
            Self::new(ExecutorErrorKind::Generation(err.kind.to_string()))
        } else {
            Self::new(ExecutorErrorKind::Rejected(err.kind.to_string()))
        }
    }
}
