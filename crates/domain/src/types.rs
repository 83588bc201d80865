// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::preparation_status::PreparationStatus;

/// A year-transition workflow instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preparation {
    pub preparation_id: i64,
    pub school_id: i64,
    pub source_year_id: i64,
    pub target_year_id: i64,
    pub status: PreparationStatus,
    pub initialized_at: String,
    pub classes_created_at: Option<String>,
    pub mapping_done_at: Option<String>,
    pub completed_at: Option<String>,
}

/// A class of some school year.
///
/// Classes of the target year are the "target classes" of a preparation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolClass {
    pub class_id: i64,
    pub year_id: i64,
    pub name: String,
    pub is_active: bool,
    pub is_archived: bool,
}

impl SchoolClass {
    /// Returns true if the class takes part in a year transition.
    #[must_use]
    pub const fn is_transitionable(&self) -> bool {
        self.is_active && !self.is_archived
    }
}

/// A student's membership in a class for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub year_id: i64,
    pub is_active: bool,
}

/// Declared correspondence from a source-year class to a target-year class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMapping {
    pub mapping_id: i64,
    pub preparation_id: i64,
    pub source_class_id: i64,
    pub target_class_id: i64,
}
