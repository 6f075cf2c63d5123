//! Validation error types
//!
//! A shape mismatch is ordinary data: [`Failure`], returned through
//! [`ValidationResult`]. Misusing the construction API is a separate
//! [`RuntypeError`].

use std::fmt;
use thiserror::Error;

// ============================================================================
// Validation Result
// ============================================================================

/// Validation result type
pub type ValidationResult<T> = std::result::Result<T, Failure>;

/// Result type for runtype construction
pub type Result<T> = std::result::Result<T, RuntypeError>;

// ============================================================================
// Failure Classification
// ============================================================================

/// Classification of validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum FailureCode {
    /// Input is null/undefined where a container was required
    NullOrUndefined,

    /// Input is not an object at all
    WrongPrimitiveKind,

    /// Input is an object, but not with the required prototype
    WrongPrototype,

    /// Input is an array where a string-keyed dictionary was required
    ArrayRejectedAsStringDictionary,

    /// A key is not numeric where numeric keys are required
    NonNumericKey,

    /// Input has the wrong kind for a primitive validator
    TypeMismatch,

    /// Input differs from the expected literal
    LiteralMismatch,

    /// Tuple length differs from the declared length
    LengthMismatch,

    /// No union alternative accepted the input
    NoMatchingAlternative,

    /// A user constraint rejected the input
    ConstraintFailed,

    /// The `never` runtype was asked to validate something
    Never,

    /// Nesting exceeded the configured maximum depth
    DepthExceeded,
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NullOrUndefined => "null_or_undefined",
            Self::WrongPrimitiveKind => "wrong_primitive_kind",
            Self::WrongPrototype => "wrong_prototype",
            Self::ArrayRejectedAsStringDictionary => "array_rejected_as_string_dictionary",
            Self::NonNumericKey => "non_numeric_key",
            Self::TypeMismatch => "type_mismatch",
            Self::LiteralMismatch => "literal_mismatch",
            Self::LengthMismatch => "length_mismatch",
            Self::NoMatchingAlternative => "no_matching_alternative",
            Self::ConstraintFailed => "constraint_failed",
            Self::Never => "never",
            Self::DepthExceeded => "depth_exceeded",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Failure
// ============================================================================

/// A failed validation
///
/// `message` is meant to be shown as-is. `key` is the dotted path to the
/// offending member, set only when the failure came from a nested value; it
/// is composed bottom-up as the failure travels through enclosing composites.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{message}{}", .key.as_ref().map(|k| format!(" in {}", k)).unwrap_or_default())]
pub struct Failure {
    /// Classification of the innermost failure
    pub code: FailureCode,

    /// Human-readable diagnosis
    pub message: String,

    /// Dotted path to the failing member (e.g. `"x.y"`)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub key: Option<String>,
}

impl Failure {
    /// Create a failure without a key
    pub fn new(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            key: None,
        }
    }

    /// Re-home this failure under a member key of an enclosing container
    ///
    /// `k` becomes the new path root: `"k.<previous key>"`, or just `"k"`.
    pub fn within(mut self, k: &str) -> Self {
        self.key = Some(match self.key.take() {
            Some(child) => format!("{}.{}", k, child),
            None => k.to_string(),
        });
        self
    }

    /// Whether the failure originated inside a nested member
    pub fn is_member_failure(&self) -> bool {
        self.key.is_some()
    }
}

// ============================================================================
// Validation Error (for `check`)
// ============================================================================

/// Error form of a [`Failure`], returned by `Runtype::check`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {failure}")]
pub struct ValidationError {
    /// The underlying failure
    #[source]
    pub failure: Failure,
}

impl From<Failure> for ValidationError {
    fn from(failure: Failure) -> Self {
        Self { failure }
    }
}

// ============================================================================
// Construction Errors
// ============================================================================

/// Misuse of the runtype construction API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntypeError {
    #[error("invalid dictionary key kind '{0}' (expected 'string' or 'number')")]
    InvalidKeyKind(String),

    #[error("a union needs at least one alternative")]
    EmptyUnion,

    #[error("an intersection needs at least one intersectee")]
    EmptyIntersection,

    #[error("duplicate record field '{0}'")]
    DuplicateField(String),

    #[error("literal must be a primitive, got {0}")]
    NonPrimitiveLiteral(&'static str),
}
