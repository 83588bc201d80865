// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-student transition outcomes.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The outcome recorded for one student when a year closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    /// Moves up to the mapped class of the next year.
    Promoted,
    /// Repeats the year in a target-year class.
    Retained,
    /// Leaves the school. Never enrolled in the target year.
    Departed,
    /// Moves to a target-year class other than the mapped one.
    Transferred,
}

impl TransitionType {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Promoted => "promoted",
            Self::Retained => "retained",
            Self::Departed => "departed",
            Self::Transferred => "transferred",
        }
    }

    /// Returns true if this outcome places the student in a target-year class.
    #[must_use]
    pub const fn requires_target_class(&self) -> bool {
        !matches!(self, Self::Departed)
    }
}

impl FromStr for TransitionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promoted" => Ok(Self::Promoted),
            "retained" => Ok(Self::Retained),
            "departed" => Ok(Self::Departed),
            "transferred" => Ok(Self::Transferred),
            _ => Err(DomainError::InvalidTransitionType(s.to_string())),
        }
    }
}

impl std::fmt::Display for TransitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An unvalidated transition as submitted by a caller.
///
/// `transition_type` stays a raw string so that unknown values are reported
/// as batch violations instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTransition {
    pub student_id: i64,
    pub source_class_id: i64,
    #[serde(default)]
    pub target_class_id: Option<i64>,
    pub transition_type: String,
}

impl DraftTransition {
    /// Creates a `promoted` draft towards the given target class.
    #[must_use]
    pub fn promoted(student_id: i64, source_class_id: i64, target_class_id: i64) -> Self {
        Self {
            student_id,
            source_class_id,
            target_class_id: Some(target_class_id),
            transition_type: TransitionType::Promoted.as_str().to_string(),
        }
    }
}

/// A transition that passed batch validation.
///
/// `target_class_id` is `None` exactly when `transition_type` is `Departed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedTransition {
    pub student_id: i64,
    pub source_class_id: i64,
    pub target_class_id: Option<i64>,
    pub transition_type: TransitionType,
}

/// The committed audit record of one student's transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentTransition {
    pub transition_id: i64,
    pub preparation_id: i64,
    pub student_id: i64,
    pub source_class_id: i64,
    pub target_class_id: Option<i64>,
    pub transition_type: TransitionType,
    /// The enrollment created for this transition, if any.
    pub enrollment_id: Option<i64>,
    pub created_at: String,
}
