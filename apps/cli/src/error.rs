//! # CLI Error Type
//!
//! Unified error type for `duka` commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Duka Ledger                            │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  AppResult<()>                                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Storage Error? ─── DbError::NotFound("Sale", "42") ─────┐             │
//! │         │                                                │             │
//! │         ▼                                                ▼             │
//! │  Domain Error? ──── CoreError::InvalidImport ──────── AppError         │
//! │         │                                           { code, message }  │
//! │         ▼                                                │             │
//! │  Config Error? ──── toml / io ───────────────────────────┘             │
//! │                                                          │             │
//! │                                                          ▼             │
//! │  stderr: "error[NOT_FOUND]: Sale not found: 42"   exit status by code  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use duka_core::{CoreError, ValidationError};
use duka_store::DbError;
use thiserror::Error;

/// Error returned from commands.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    /// Machine-readable error code, also selects the exit status
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Result type for commands.
pub type AppResult<T> = Result<T, AppError>;

/// Error codes for CLI failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Sale or inventory item not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Import document rejected
    InvalidImport,

    /// Not enough stock to record a sale
    InsufficientStock,

    /// Config file missing, unreadable or invalid
    ConfigError,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidImport => "INVALID_IMPORT",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this code.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorCode::ValidationError | ErrorCode::InvalidImport => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::InsufficientStock => 4,
            ErrorCode::ConfigError => 5,
            ErrorCode::DatabaseError | ErrorCode::Internal => 1,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }

    /// Creates an I/O error naming the file involved.
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        AppError::new(ErrorCode::Internal, format!("{}: {}", path.display(), err))
    }
}

/// Converts storage errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::Core(core) => AppError::from(core),
            DbError::CorruptDocument { .. } => AppError::new(ErrorCode::DatabaseError, err.to_string()),
            DbError::ConnectionFailed(e) => {
                AppError::new(ErrorCode::DatabaseError, format!("Database connection failed: {}", e))
            }
            DbError::MigrationFailed(e) => {
                AppError::new(ErrorCode::DatabaseError, format!("Database migration failed: {}", e))
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => AppError::new(ErrorCode::DatabaseError, "Database pool exhausted"),
            DbError::Serialization(e) => AppError::new(ErrorCode::Internal, e.to_string()),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts domain errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidImport { reason } => {
                AppError::new(ErrorCode::InvalidImport, format!("Invalid import file: {}", reason))
            }
            CoreError::PeriodIndexOutOfRange { index, len } => AppError::validation(format!(
                "Row {} does not exist (report has {} rows)",
                index + 1,
                len
            )),
            CoreError::ItemNotFound(id) => AppError::not_found("Inventory item", &id),
            CoreError::InsufficientStock {
                item,
                available,
                requested,
            } => AppError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    item, available, requested
                ),
            ),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
            CoreError::Serialization(e) => AppError::new(ErrorCode::Internal, e.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::config(format!("Failed to parse config: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::new(ErrorCode::Internal, err.to_string())
    }
}
