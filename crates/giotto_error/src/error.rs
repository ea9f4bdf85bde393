//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, ExecutorError, GeneratorError, JsonError, ScriptError, StorageError,
};

/// This is the foundation error enum. Each Giotto crate contributes the
/// variants for its own failure domain.
///
/// # Examples
///
/// ```
/// use giotto_error::{GiottoError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::NotFound("hero_bg".to_string()));
/// let err: GiottoError = storage_err.into();
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GiottoErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Script loading error
    #[from(ScriptError)]
    Script(ScriptError),
    /// Asset storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Generation backend error
    #[from(GeneratorError)]
    Generator(GeneratorError),
    /// Asset executor error
    #[from(ExecutorError)]
    Executor(ExecutorError),
}

/// Giotto error with kind discrimination.
///
/// # Examples
///
/// ```
/// use giotto_error::{GiottoResult, ConfigError};
///
/// fn might_fail() -> GiottoResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Giotto Error: {}", _0)]
pub struct GiottoError(Box<GiottoErrorKind>);

impl GiottoError {
    /// Create a new error from a kind.
    pub fn new(kind: GiottoErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GiottoErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to GiottoErrorKind
impl<T> From<T> for GiottoError
where
    T: Into<GiottoErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Giotto operations.
///
/// # Examples
///
/// ```
/// use giotto_error::{GiottoResult, JsonError};
///
/// fn decode_document() -> GiottoResult<String> {
///     Err(JsonError::new("expected an object"))?
/// }
/// ```
pub type GiottoResult<T> = std::result::Result<T, GiottoError>;
