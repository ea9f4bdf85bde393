//! Script loading error types.
//!
//! Validation diagnostics (schema violations, duplicate IDs, unknown
//! references, cycles) are domain data carried by `giotto_script` and are not
//! represented here. This module covers failures to obtain a document at all.

/// Specific error conditions for script loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ScriptErrorKind {
    /// Failed to read script file
    #[display("Failed to read script file: {}", _0)]
    FileRead(String),
    /// Document is not syntactically valid JSON
    #[display("Failed to parse JSON: {}", _0)]
    JsonParse(String),
    /// Document parsed but is not an object with an `actions` array
    #[display("Invalid document shape: {}", _0)]
    InvalidDocument(String),
}

/// Error type for script loading operations.
///
/// # Examples
///
/// ```
/// use giotto_error::{ScriptError, ScriptErrorKind};
///
/// let err = ScriptError::new(ScriptErrorKind::JsonParse("unexpected EOF".to_string()));
/// assert!(format!("{}", err).contains("parse JSON"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Script Error: {} at line {} in {}", kind, line, file)]
pub struct ScriptError {
    /// The specific error condition
    pub kind: ScriptErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScriptError {
    /// Create a new ScriptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScriptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
