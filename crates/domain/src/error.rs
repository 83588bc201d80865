// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A single rule violation found while validating a transition batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionViolation {
    /// Position of the offending entry in the submitted batch.
    pub index: usize,
    /// The student the entry refers to.
    pub student_id: i64,
    /// The field that failed validation.
    pub field: String,
    /// A human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for TransitionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "entry {} (student {}): {}: {}",
            self.index, self.student_id, self.field, self.message
        )
    }
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A preparation status string is not recognised.
    InvalidStatus(String),
    /// A status transition is not permitted by the workflow.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// A transition type string is not recognised.
    InvalidTransitionType(String),
    /// A class name is empty or invalid.
    InvalidClassName(String),
    /// A school year label is empty or invalid.
    InvalidYearLabel(String),
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A school year's end date is not after its start date.
    InvalidYearRange {
        /// The year label.
        label: String,
    },
    /// The requested target year does not start after the source year.
    TargetYearNotAfterSource {
        /// The source year ID.
        source_year_id: i64,
        /// The target year ID.
        target_year_id: i64,
    },
    /// A school year belongs to a different school.
    YearSchoolMismatch {
        /// The year ID.
        year_id: i64,
        /// The school that was expected to own it.
        school_id: i64,
    },
    /// One or more entries of a transition batch are invalid.
    InvalidTransitionBatch(Vec<TransitionViolation>),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus(status) => write!(f, "Invalid preparation status: '{status}'"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition from {from} to {to}: {reason}")
            }
            Self::InvalidTransitionType(value) => {
                write!(f, "Invalid transition type: '{value}'")
            }
            Self::InvalidClassName(msg) => write!(f, "Invalid class name: {msg}"),
            Self::InvalidYearLabel(msg) => write!(f, "Invalid school year label: {msg}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidYearRange { label } => {
                write!(f, "School year '{label}' must end after it starts")
            }
            Self::TargetYearNotAfterSource {
                source_year_id,
                target_year_id,
            } => {
                write!(
                    f,
                    "Target year {target_year_id} does not start after source year {source_year_id}"
                )
            }
            Self::YearSchoolMismatch { year_id, school_id } => {
                write!(f, "School year {year_id} does not belong to school {school_id}")
            }
            Self::InvalidTransitionBatch(violations) => {
                write!(
                    f,
                    "Transition batch rejected with {} violation(s)",
                    violations.len()
                )?;
                for violation in violations {
                    write!(f, "; {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DomainError {}
