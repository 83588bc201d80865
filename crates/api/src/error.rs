// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use rollover_domain::{DomainError, TransitionViolation};
use rollover_persistence::PersistenceError;
use serde::Serialize;
use thiserror::Error;

/// One rejected field of a request.
///
/// Batch entries carry their position and student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    pub field: String,
    pub message: String,
}

impl From<TransitionViolation> for FieldViolation {
    fn from(violation: TransitionViolation) -> Self {
        Self {
            index: Some(violation.index),
            student_id: Some(violation.student_id),
            field: violation.field,
            message: violation.message,
        }
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| match v.index {
            Some(index) => format!("[{index}].{}: {}", v.field, v.message),
            None => format!("{}: {}", v.field, v.message),
        })
        .collect::<Vec<String>>()
        .join("; ")
}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent
/// the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request was rejected field by field.
    #[error("Validation failed: {}", summarize(.violations))]
    ValidationError { violations: Vec<FieldViolation> },

    /// The source class is already mapped in this preparation.
    #[error("Source class {source_class_id} is already mapped in preparation {preparation_id}")]
    UniqueMappingViolation {
        preparation_id: i64,
        source_class_id: i64,
    },

    /// Some source classes have no mapping yet.
    #[error("Preparation {preparation_id} has unmapped source classes: {unmapped_class_ids:?}")]
    IncompleteMapping {
        preparation_id: i64,
        unmapped_class_ids: Vec<i64>,
    },

    /// The preparation is not in a status that allows the operation.
    #[error("{message}")]
    StateConflict {
        expected: Option<String>,
        actual: Option<String>,
        message: String,
    },

    /// A promotion batch failed and nothing of it was stored.
    #[error("Promotion for preparation {preparation_id} was rolled back and may be retried: {message}")]
    PartialApplyFailure { preparation_id: i64, message: String },

    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    NotFound {
        resource_type: String,
        message: String,
    },

    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Builds a validation error for a single field.
    #[must_use]
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            violations: vec![FieldViolation {
                index: None,
                student_id: None,
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }

    /// Stable machine-readable kind of the error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "validation_error",
            Self::UniqueMappingViolation { .. } => "unique_mapping_violation",
            Self::IncompleteMapping { .. } => "incomplete_mapping",
            Self::StateConflict { .. } => "state_conflict",
            Self::PartialApplyFailure { .. } => "partial_apply_failure",
            Self::NotFound { .. } => "not_found",
            Self::Internal { .. } => "internal",
        }
    }

    /// Returns true if the same request may succeed when sent again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::PartialApplyFailure { .. })
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStatus(value) => {
            ApiError::invalid("status", format!("'{value}' is not a preparation status"))
        }
        DomainError::InvalidStatusTransition { from, to, reason } => ApiError::StateConflict {
            message: format!("Cannot move from {from} to {to}: {reason}"),
            expected: None,
            actual: Some(from),
        },
        DomainError::InvalidTransitionType(value) => ApiError::invalid(
            "transition_type",
            format!("'{value}' is not one of promoted, retained, departed, transferred"),
        ),
        DomainError::InvalidClassName(message) => ApiError::invalid("name", message),
        DomainError::InvalidYearLabel(message) => ApiError::invalid("label", message),
        DomainError::DateParseError { date_string, error } => ApiError::invalid(
            "date",
            format!("Failed to parse date '{date_string}': {error}"),
        ),
        DomainError::DateArithmeticOverflow { operation } => ApiError::invalid(
            "date",
            format!("Date arithmetic overflow while {operation}"),
        ),
        DomainError::InvalidYearRange { label } => ApiError::invalid(
            "end_date",
            format!("School year '{label}' must end after it starts"),
        ),
        err @ (DomainError::TargetYearNotAfterSource { .. }
        | DomainError::YearSchoolMismatch { .. }) => {
            ApiError::invalid("target_year_id", err.to_string())
        }
        DomainError::InvalidTransitionBatch(violations) => ApiError::ValidationError {
            violations: violations.into_iter().map(FieldViolation::from).collect(),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::NotFound {
            resource_type: String::from("Resource"),
            message,
        },
        PersistenceError::StateConflict {
            preparation_id,
            expected,
            actual,
        } => ApiError::StateConflict {
            message: format!(
                "Preparation {preparation_id} is in status '{actual}', expected '{expected}'"
            ),
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
        },
        err @ PersistenceError::StepClosed { status, .. } => ApiError::StateConflict {
            message: err.to_string(),
            expected: None,
            actual: Some(status.to_string()),
        },
        PersistenceError::IncompleteMapping {
            preparation_id,
            unmapped_class_ids,
        } => ApiError::IncompleteMapping {
            preparation_id,
            unmapped_class_ids,
        },
        err @ PersistenceError::NoTargetClasses { .. } => {
            ApiError::invalid("target_classes", err.to_string())
        }
        PersistenceError::MappingExists {
            preparation_id,
            source_class_id,
        } => ApiError::UniqueMappingViolation {
            preparation_id,
            source_class_id,
        },
        PersistenceError::InvalidReference { field, message } => ApiError::invalid(&field, message),
        PersistenceError::ApplyRolledBack {
            preparation_id,
            reason,
        } => ApiError::PartialApplyFailure {
            preparation_id,
            message: reason,
        },
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::UniqueViolation(message) => ApiError::invalid("unique", message),
        PersistenceError::ForeignKeyViolation(message) => ApiError::invalid("reference", message),
        PersistenceError::CheckViolation(message) => ApiError::invalid("constraint", message),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}
