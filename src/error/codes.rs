//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Store errors
//! - 2xx: Sync errors
//! - 3xx: Config errors
//! - 6xx: Storage backend errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
///
/// Each variant maps to a numeric code (e.g., `DuplicateKey` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Store errors (1xx)
    // ========================================
    /// E101: Create on an id that already has an entity row
    DuplicateKey,
    /// E102: Update or rollback on an id with no entity row
    EntityNotFound,
    /// E103: Rollback target version does not exist
    VersionNotFound,

    // ========================================
    // Sync errors (2xx)
    // ========================================
    /// E201: A row could not be transferred during a sync phase
    TransferFailed,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file or value is invalid
    ConfigInvalid,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Store could not be opened
    ConnectionFailed,
    /// E602: Transaction could not complete and was rolled back
    TransactionFailed,
    /// E604: Database operation failed
    DatabaseError,
    /// E605: Serialization/deserialization failed
    SerializationError,
    /// E606: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `DuplicateKey` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::DuplicateKey => 101,
            Self::EntityNotFound => 102,
            Self::VersionNotFound => 103,

            Self::TransferFailed => 201,

            Self::ConfigInvalid => 301,

            Self::ConnectionFailed => 601,
            Self::TransactionFailed => 602,
            Self::DatabaseError => 604,
            Self::SerializationError => 605,
            Self::IoError => 606,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Category name derived from the numeric range.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() {
            100..=199 => "store",
            200..=299 => "sync",
            300..=399 => "config",
            _ => "storage",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}", self.numeric())
    }
}
