//! Generation backend error types and retry classification.

/// Generation backend error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeneratorErrorKind {
    /// API credentials not configured
    #[display("Generation credentials not configured for {}", _0)]
    MissingCredentials(String),
    /// Backend rejected the request as malformed
    #[display("Invalid generation request: {}", _0)]
    InvalidRequest(String),
    /// Backend is temporarily unavailable
    #[display("Generation backend unavailable: {}", _0)]
    Unavailable(String),
    /// Backend timed out
    #[display("Generation timed out after {}ms", _0)]
    Timeout(u64),
    /// Backend reported its own rate limit
    #[display("Generation backend rate limited, retry after {}ms", _0)]
    RateLimited(u64),
    /// Backend returned unusable output
    #[display("Malformed generation response: {}", _0)]
    MalformedResponse(String),
}

impl GeneratorErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeneratorErrorKind::Unavailable(_)
                | GeneratorErrorKind::Timeout(_)
                | GeneratorErrorKind::RateLimited(_)
        )
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            GeneratorErrorKind::RateLimited(hint_ms) => ((*hint_ms).max(1000), 3, 40),
            GeneratorErrorKind::Unavailable(_) => (2000, 5, 60),
            GeneratorErrorKind::Timeout(_) => (1000, 3, 10),
            _ => (2000, 5, 60),
        }
    }
}

/// Generation backend error with source location tracking.
///
/// # Examples
///
/// ```
/// use giotto_error::{GeneratorError, GeneratorErrorKind};
///
/// let err = GeneratorError::new(GeneratorErrorKind::Timeout(5000));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generator Error: {} at line {} in {}", kind, line, file)]
pub struct GeneratorError {
    /// The kind of error that occurred
    pub kind: GeneratorErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeneratorError {
    /// Create a new generator error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeneratorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for GeneratorError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}

/// Trait for errors that carry their own retry classification.
///
/// # Examples
///
/// ```
/// use giotto_error::{GeneratorError, GeneratorErrorKind, RetryableError};
///
/// let err = GeneratorError::new(GeneratorErrorKind::Unavailable("503".to_string()));
/// assert!(err.is_retryable());
/// let (backoff, retries, max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(retries, 5);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like backend overload or timeouts should return true.
    /// Permanent errors like invalid requests or missing credentials should
    /// return false.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 5, 60)
    }
}
