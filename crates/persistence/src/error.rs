// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use rollover_domain::{DomainError, PreparationStatus};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    NotFound(String),
    /// A uniqueness constraint rejected the write.
    UniqueViolation(String),
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation(String),
    /// A CHECK constraint rejected the write.
    CheckViolation(String),
    /// The preparation was not in the expected status.
    StateConflict {
        preparation_id: i64,
        expected: PreparationStatus,
        actual: PreparationStatus,
    },
    /// The preparation's status no longer allows the operation.
    StepClosed {
        preparation_id: i64,
        status: PreparationStatus,
        operation: String,
    },
    /// Some source classes have no mapping.
    IncompleteMapping {
        preparation_id: i64,
        unmapped_class_ids: Vec<i64>,
    },
    /// The target year has no classes yet.
    NoTargetClasses { target_year_id: i64 },
    /// The source class already has a mapping in this preparation.
    MappingExists {
        preparation_id: i64,
        source_class_id: i64,
    },
    /// A referenced row exists but does not belong where it was used.
    InvalidReference { field: String, message: String },
    /// A promotion batch failed and every write was rolled back.
    ApplyRolledBack { preparation_id: i64, reason: String },
    /// A domain rule rejected the operation.
    DomainViolation(DomainError),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Row reconstruction error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::UniqueViolation(msg) => write!(f, "Uniqueness violation: {msg}"),
            Self::ForeignKeyViolation(msg) => write!(f, "Foreign key violation: {msg}"),
            Self::CheckViolation(msg) => write!(f, "Check constraint violation: {msg}"),
            Self::StateConflict {
                preparation_id,
                expected,
                actual,
            } => write!(
                f,
                "Preparation {preparation_id} is in status '{actual}', expected '{expected}'"
            ),
            Self::StepClosed {
                preparation_id,
                status,
                operation,
            } => write!(
                f,
                "Preparation {preparation_id} is in status '{status}' and no longer allows {operation}"
            ),
            Self::IncompleteMapping {
                preparation_id,
                unmapped_class_ids,
            } => write!(
                f,
                "Preparation {preparation_id} has unmapped source classes: {unmapped_class_ids:?}"
            ),
            Self::NoTargetClasses { target_year_id } => {
                write!(f, "Target year {target_year_id} has no classes")
            }
            Self::MappingExists {
                preparation_id,
                source_class_id,
            } => write!(
                f,
                "Source class {source_class_id} is already mapped in preparation {preparation_id}"
            ),
            Self::InvalidReference { field, message } => {
                write!(f, "Invalid reference in '{field}': {message}")
            }
            Self::ApplyRolledBack {
                preparation_id,
                reason,
            } => write!(
                f,
                "Promotion for preparation {preparation_id} was rolled back: {reason}"
            ),
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                Self::CheckViolation(info.message().to_string())
            }
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl PersistenceError {
    /// Returns true for storage-level failures, as opposed to workflow
    /// rejections.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_)
                | Self::QueryFailed(_)
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::CheckViolation(_)
        )
    }
}
