//! Error types for rate limiting operations.

use std::fmt;
use std::time::Duration;

/// Error kinds for rate limiting operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateLimitErrorKind {
    /// Configuration file error.
    Config(String),
    /// Admission denied; retry after the indicated wait.
    Exhausted {
        /// Resource class that ran out of slots
        resource: String,
        /// How long to wait before retrying acquisition
        retry_after: Duration,
    },
    /// No limiter configured for the requested resource class.
    UnknownResource(String),
}

impl fmt::Display for RateLimitErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitErrorKind::Config(msg) => write!(f, "Configuration error: {}", msg),
            RateLimitErrorKind::Exhausted {
                resource,
                retry_after,
            } => write!(
                f,
                "Rate limit exhausted for {}, retry after {}ms",
                resource,
                retry_after.as_millis()
            ),
            RateLimitErrorKind::UnknownResource(resource) => {
                write!(f, "Unknown resource class: {}", resource)
            }
        }
    }
}

/// Rate limiting error with location tracking.
#[derive(Debug, Clone)]
pub struct RateLimitError {
    kind: RateLimitErrorKind,
    line: u32,
    file: &'static str,
}

impl RateLimitError {
    /// Create a new rate limiting error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RateLimitErrorKind {
        &self.kind
    }

    /// Suggested wait before retrying acquisition, when the limiter knows it.
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            RateLimitErrorKind::Exhausted { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rate Limit Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for RateLimitError {}

impl<T> From<T> for RateLimitError
where
    T: Into<RateLimitErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}
