//! Error handling for versync.
//!
//! This module provides:
//! - [`VsError`]: The main error enum for all store, retention and sync operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Serializable error payload for robot mode output

mod codes;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;

/// Main error type for versync operations.
#[derive(Error, Debug)]
pub enum VsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entity {0} already exists")]
    DuplicateKey(i64),

    #[error("Entity {0} not found")]
    NotFound(i64),

    #[error("Version {version} not found for entity {id}")]
    VersionNotFound { id: i64, version: i64 },

    #[error("Transaction failed during {operation}: {reason}")]
    TransactionFailure { operation: String, reason: String },

    #[error("Cannot open store {locator}: {reason}")]
    ConnectionFailure { locator: String, reason: String },

    #[error("Sync {phase} failed{}: {reason}", .id.map(|id| format!(" at entity {id}")).unwrap_or_default())]
    TransferFailure {
        phase: String,
        id: Option<i64>,
        reason: String,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl VsError {
    /// Wrap a backend error raised inside a mutating operation.
    pub fn transaction(operation: &str, err: impl std::fmt::Display) -> Self {
        Self::TransactionFailure {
            operation: operation.to_string(),
            reason: err.to_string(),
        }
    }

    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::DuplicateKey(_) => ErrorCode::DuplicateKey,
            Self::NotFound(_) => ErrorCode::EntityNotFound,
            Self::VersionNotFound { .. } => ErrorCode::VersionNotFound,
            Self::TransactionFailure { .. } => ErrorCode::TransactionFailed,
            Self::ConnectionFailure { .. } => ErrorCode::ConnectionFailed,
            Self::TransferFailure { .. } => ErrorCode::TransferFailed,
            Self::Config(_) => ErrorCode::ConfigInvalid,
        }
    }

    /// Whether retrying the same call can succeed without caller changes.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransactionFailure { .. }
                | Self::ConnectionFailure { .. }
                | Self::TransferFailure { .. }
        )
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::DuplicateKey(id) | Self::NotFound(id) => Some(serde_json::json!({ "id": id })),
            Self::VersionNotFound { id, version } => {
                Some(serde_json::json!({ "id": id, "version": version }))
            }
            Self::TransactionFailure { operation, .. } => {
                Some(serde_json::json!({ "operation": operation }))
            }
            Self::ConnectionFailure { locator, .. } => {
                Some(serde_json::json!({ "locator": locator }))
            }
            Self::TransferFailure { phase, id, .. } => {
                Some(serde_json::json!({ "phase": phase, "id": id }))
            }
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_vs_error(self)
    }
}

/// A structured error with machine-readable code and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Always true; lets consumers branch on a single field.
    pub error: bool,

    /// The error code (e.g., "DUPLICATE_KEY")
    pub code: ErrorCode,

    /// Formatted code (e.g., "E101")
    pub code_string: String,

    /// Human-readable error message
    pub message: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether the caller can retry the same operation
    pub retryable: bool,
}

impl StructuredError {
    #[must_use]
    pub fn from_vs_error(err: &VsError) -> Self {
        let code = err.code();
        Self {
            error: true,
            code,
            code_string: code.code_string(),
            message: err.to_string(),
            context: err.context(),
            retryable: err.is_retryable(),
        }
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code_string, self.message)
    }
}

pub type Result<T> = std::result::Result<T, VsError>;
