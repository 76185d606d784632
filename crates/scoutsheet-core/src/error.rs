//! Scoring error types.
//!
//! Every variant here is recovered locally: a bad config line drops one field
//! or equation, a bad team value substitutes `0`, and a bad expression scores
//! `0.0`. Callers collect them as diagnostics instead of aborting the batch.

use thiserror::Error;

/// Errors raised while parsing form configuration or scoring a team.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoutError {
    /// A field line names a type that is not in the registry.
    #[error("field type not recognized: {0}")]
    UnrecognizedFieldType(String),

    /// A field line is missing a segment its type requires.
    #[error("malformed {field_type} line: {reason}")]
    MalformedLine { field_type: String, reason: String },

    /// An equation line has no `=` delimiter.
    #[error("malformed equation (expected `Name = expression`): {0}")]
    MalformedEquation(String),

    /// A text field or stepper answer could not be read as a number.
    #[error("{key} does not have a numeric value")]
    NumericCoercionFailure { key: String, raw: String },

    /// The substituted expression could not be parsed.
    #[error("invalid expression `{expression}`: {message}")]
    ExpressionSyntaxError { expression: String, message: String },

    /// The expression evaluated to infinity or NaN.
    #[error("expression `{0}` did not produce a finite number")]
    NonFiniteResult(String),
}

impl ScoutError {
    /// Returns `true` for errors raised while loading configuration lines.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScoutError::UnrecognizedFieldType(_)
                | ScoutError::MalformedLine { .. }
                | ScoutError::MalformedEquation(_)
        )
    }
}
