//! # Error Types
//!
//! Structured error types for combo_core. These errors are designed to be
//! informative for both humans and tools, providing enough context to
//! understand and fix an input programmatically.
//!
//! ## Example
//!
//! ```rust
//! use combo_core::errors::{CalcError, CalcResult};
//!
//! fn validate_dead(dead: f64) -> CalcResult<()> {
//!     if dead <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "dead",
//!             dead.to_string(),
//!             "Dead load must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for combo_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for load combination runs.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by the CLI and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Input validation found one or more problems; the run was not attempted
    #[error("Input validation failed: {}", errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Collapse a list of individual input errors into a single ValidationFailed
    pub fn validation_failed(errors: &[CalcError]) -> Self {
        CalcError::ValidationFailed {
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Messages suitable for listing to a user, one per problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            CalcError::ValidationFailed { errors } => errors.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::ValidationFailed { .. } => "VALIDATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("dead", "-5", "Dead load must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::ValidationFailed { errors: vec![] }.error_code(),
            "VALIDATION_FAILED"
        );
    }

    #[test]
    fn test_validation_failed_keeps_every_message() {
        let errs = vec![
            CalcError::invalid_input("dead", "0", "Dead load must be positive"),
            CalcError::invalid_input("live", "-1", "Live load cannot be negative"),
        ];
        let combined = CalcError::validation_failed(&errs);
        let messages = combined.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("dead"));
        assert!(messages[1].contains("live"));
        assert!(combined.to_string().contains("; "));
    }
}
