//! # Error Types
//!
//! Structured error types for patio_core.
//!
//! Code-compliance problems (a span too long for the chosen joist, a post
//! too tall for its section) are *not* errors: they are reported as
//! [`Violation`](crate::validator::Violation)s. `CalcError` is reserved for
//! inputs that should never reach generation: zero denominators in spacing
//! formulas, aggregate queries over empty groups, dimensions outside every
//! lumber table.
//!
//! ## Example
//!
//! ```rust
//! use patio_core::errors::{CalcError, CalcResult};
//!
//! fn spacing(length_in: f64, gaps: u32) -> CalcResult<f64> {
//!     if gaps == 0 {
//!         return Err(CalcError::invalid_input(
//!             "posts_per_beam",
//!             "1",
//!             "At least two posts are needed to derive a spacing",
//!         ));
//!     }
//!     Ok(length_in / gaps as f64)
//! }
//!
//! assert!(spacing(185.0, 0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for patio_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for generation and search operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, zero denominator, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Aggregate query over a structural group that holds no pieces
    #[error("Structural group '{group}' has no pieces")]
    EmptyGroup { group: String },

    /// A dimension has no entry in the nominal/actual lumber tables
    #[error("Dimension {value} is not representable in the lumber catalog")]
    Unrepresentable { value: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
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

    /// Create an EmptyGroup error
    pub fn empty_group(group: impl Into<String>) -> Self {
        CalcError::EmptyGroup { group: group.into() }
    }

    /// Create an Unrepresentable error for a value in inches
    pub fn unrepresentable(value_in: f64) -> Self {
        CalcError::Unrepresentable {
            value: format!("{}\"", value_in),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::EmptyGroup { .. } => "EMPTY_GROUP",
            CalcError::Unrepresentable { .. } => "UNREPRESENTABLE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("joist_spacing", "0", "Spacing must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::empty_group("Beam 1").error_code(), "EMPTY_GROUP");
        assert_eq!(CalcError::unrepresentable(2.0).error_code(), "UNREPRESENTABLE");
    }

    #[test]
    fn test_unrepresentable_message() {
        let err = CalcError::unrepresentable(2.25);
        assert_eq!(err.to_string(), "Dimension 2.25\" is not representable in the lumber catalog");
    }

    #[test]
    fn test_from_json_error() {
        let err: CalcError = serde_json::from_str::<f64>("not a number").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
