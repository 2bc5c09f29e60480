//! # Error Types
//!
//! Domain-specific error types for duka-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  duka-core errors (this file)                                          │
//! │  ├── CoreError        - Domain failures (import, drill-down, stock)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  duka-store errors (separate crate)                                    │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → stderr       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed stored records are NOT errors. The normalizer repairs them
//! silently; only operations a user explicitly asked for can fail.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An import document was rejected.
    ///
    /// ## When This Occurs
    /// - The file is not valid JSON
    /// - The JSON is valid but its top level is not an array of sales
    ///
    /// Storage is never touched when this is returned.
    #[error("Invalid import: {reason}")]
    InvalidImport { reason: String },

    /// A drill-down asked for a period row that does not exist.
    ///
    /// ## User Workflow
    /// ```text
    /// Report shows 3 period rows (index 0..=2)
    ///      │
    ///      ▼
    /// drill 5
    ///      │
    ///      ▼
    /// PeriodIndexOutOfRange { index: 5, len: 3 }
    /// ```
    #[error("Period index {index} out of range (report has {len} periods)")]
    PeriodIndexOutOfRange { index: usize, len: usize },

    /// Inventory item cannot be found.
    #[error("Inventory item not found: {0}")]
    ItemNotFound(String),

    /// Insufficient stock to record a sale.
    #[error("Insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A document could not be written as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates an InvalidImport error.
    pub fn invalid_import(reason: impl Into<String>) -> Self {
        CoreError::InvalidImport {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input (command line flags, new inventory items)
/// doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid date, invalid amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            item: "Soap".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Soap: available 3, requested 5"
        );

        let err = CoreError::PeriodIndexOutOfRange { index: 5, len: 3 };
        assert_eq!(
            err.to_string(),
            "Period index 5 out of range (report has 3 periods)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvalidFormat {
            field: "from".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        };
        assert_eq!(err.to_string(), "from has invalid format: expected YYYY-MM-DD");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
