//! Validation diagnostics.
//!
//! A failed parse returns the full list of these rather than stopping at
//! the first problem, so a caller fixes a script in one round-trip. These
//! are domain data, not runtime errors; script-loading failures live in
//! `giotto_error`.

use serde::{Deserialize, Serialize};

/// The phase and rule a validation diagnostic belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Document violates the action grammar
    Schema,
    /// An identifier is declared more than once
    DuplicateId,
    /// A reference names an undeclared identifier
    UnknownReference,
    /// The reference graph contains a cycle
    CircularDependency,
    /// A `when_then` condition is not a dot-separated identifier path
    InvalidCondition,
    /// A feature target is not a dot-separated identifier path
    InvalidTarget,
}

/// One validation diagnostic.
///
/// # Examples
///
/// ```
/// use giotto_script::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::schema("actions[2].prompt", "expected a string");
/// assert_eq!(err.kind, ValidationErrorKind::Schema);
/// assert_eq!(err.path.as_deref(), Some("actions[2].prompt"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Which rule was violated
    pub kind: ValidationErrorKind,
    /// Human-readable description
    pub message: String,
    /// Index of the offending top-level action, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_index: Option<usize>,
    /// Identifier of the offending action, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    /// Dotted path locating the offending field, for schema errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Candidate corrections for unknown references, best first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ValidationError {
    /// A schema violation at a dotted field path.
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind: ValidationErrorKind::Schema,
            message: format!("{}: {}", path, message.into()),
            action_index: None,
            action_id: None,
            path: Some(path),
            suggestions: Vec::new(),
        }
    }

    /// A duplicate identifier declaration.
    pub fn duplicate_id(id: impl Into<String>, action_index: usize) -> Self {
        let id = id.into();
        Self {
            kind: ValidationErrorKind::DuplicateId,
            message: format!("Duplicate action id '{}'", id),
            action_index: Some(action_index),
            action_id: Some(id),
            path: None,
            suggestions: Vec::new(),
        }
    }

    /// A reference to an undeclared identifier, with candidate corrections.
    pub fn unknown_reference(
        referent: impl Into<String>,
        action_index: usize,
        action_id: Option<&str>,
        suggestions: Vec<String>,
    ) -> Self {
        let referent = referent.into();
        let by = match action_id {
            Some(id) => format!("Action '{}'", id),
            None => format!("Action at index {}", action_index),
        };
        let message = if suggestions.is_empty() {
            format!("{} references unknown id '{}'", by, referent)
        } else {
            format!(
                "{} references unknown id '{}'. Did you mean: {}?",
                by,
                referent,
                suggestions.join(", ")
            )
        };
        Self {
            kind: ValidationErrorKind::UnknownReference,
            message,
            action_index: Some(action_index),
            action_id: action_id.map(str::to_string),
            path: None,
            suggestions,
        }
    }

    /// An invalid `when_then` condition path.
    pub fn invalid_condition(
        condition: impl Into<String>,
        action_index: usize,
        action_id: Option<&str>,
    ) -> Self {
        Self {
            kind: ValidationErrorKind::InvalidCondition,
            message: format!(
                "Condition '{}' is not a dot-separated identifier path",
                condition.into()
            ),
            action_index: Some(action_index),
            action_id: action_id.map(str::to_string),
            path: None,
            suggestions: Vec::new(),
        }
    }

    /// An invalid feature target path.
    pub fn invalid_target(
        target: impl Into<String>,
        action_index: usize,
        action_id: Option<&str>,
    ) -> Self {
        Self {
            kind: ValidationErrorKind::InvalidTarget,
            message: format!(
                "Target '{}' is not a dot-separated identifier path",
                target.into()
            ),
            action_index: Some(action_index),
            action_id: action_id.map(str::to_string),
            path: None,
            suggestions: Vec::new(),
        }
    }

    /// A circular dependency, reported with the full cycle in traversal order.
    pub fn circular_dependency(cycle: &[String]) -> Self {
        let mut rendered = cycle.join(" -> ");
        if let Some(first) = cycle.first() {
            rendered.push_str(" -> ");
            rendered.push_str(first);
        }
        Self {
            kind: ValidationErrorKind::CircularDependency,
            message: format!("Circular dependency detected: {}", rendered),
            action_index: None,
            action_id: cycle.first().cloned(),
            path: None,
            suggestions: Vec::new(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
