// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use rollover::MappingProgress;
use rollover_domain::{
    ClassMapping, DraftTransition, Enrollment, Preparation, PreparationStatus, SchoolClass,
    SchoolYear, StudentTransition, TransitionType, format_date,
};
use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

/// Request to open (or fetch) the preparation of a school's source year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetOrCreatePreparationRequest {
    pub school_id: i64,
    pub source_year_id: i64,
    /// Resolved from the school's years when absent.
    #[serde(default)]
    pub target_year_id: Option<i64>,
}

/// Request to move a preparation to its next status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdvanceStatusRequest {
    pub expected_status: String,
    pub next_status: String,
}

/// Request to create a class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
}

/// Request to map a source class to a target class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateMappingRequest {
    pub source_class_id: i64,
    pub target_class_id: i64,
}

/// A promotion batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromoteRequest {
    pub transitions: Vec<DraftTransition>,
}

/// Request to create a school year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateYearRequest {
    pub school_id: i64,
    pub label: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`.
    pub end_date: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
}

/// Request to add a class to a year's roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRosterClassRequest {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_archived: bool,
}

/// Request to enroll a student in a class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
}

/// A preparation as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationInfo {
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

impl From<Preparation> for PreparationInfo {
    fn from(preparation: Preparation) -> Self {
        Self {
            preparation_id: preparation.preparation_id,
            school_id: preparation.school_id,
            source_year_id: preparation.source_year_id,
            target_year_id: preparation.target_year_id,
            status: preparation.status,
            initialized_at: preparation.initialized_at,
            classes_created_at: preparation.classes_created_at,
            mapping_done_at: preparation.mapping_done_at,
            completed_at: preparation.completed_at,
        }
    }
}

/// Result of opening a preparation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOrCreatePreparationResponse {
    pub preparation: PreparationInfo,
    /// False when an open preparation already existed.
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolYearInfo {
    pub year_id: i64,
    pub school_id: i64,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub is_next: bool,
}

impl From<SchoolYear> for SchoolYearInfo {
    fn from(year: SchoolYear) -> Self {
        Self {
            year_id: year.year_id,
            school_id: year.school_id,
            label: year.label,
            start_date: format_date(year.start_date),
            end_date: format_date(year.end_date),
            is_current: year.is_current,
            is_next: year.is_next,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub class_id: i64,
    pub year_id: i64,
    pub name: String,
    pub is_active: bool,
    pub is_archived: bool,
}

impl From<SchoolClass> for ClassInfo {
    fn from(class: SchoolClass) -> Self {
        Self {
            class_id: class.class_id,
            year_id: class.year_id,
            name: class.name,
            is_active: class.is_active,
            is_archived: class.is_archived,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentInfo {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub year_id: i64,
    pub is_active: bool,
}

impl From<Enrollment> for EnrollmentInfo {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            enrollment_id: enrollment.enrollment_id,
            student_id: enrollment.student_id,
            class_id: enrollment.class_id,
            year_id: enrollment.year_id,
            is_active: enrollment.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMappingInfo {
    pub mapping_id: i64,
    pub preparation_id: i64,
    pub source_class_id: i64,
    pub target_class_id: i64,
}

impl From<ClassMapping> for ClassMappingInfo {
    fn from(mapping: ClassMapping) -> Self {
        Self {
            mapping_id: mapping.mapping_id,
            preparation_id: mapping.preparation_id,
            source_class_id: mapping.source_class_id,
            target_class_id: mapping.target_class_id,
        }
    }
}

/// Which active source classes of a preparation are mapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingProgressResponse {
    pub preparation_id: i64,
    pub source_class_ids: Vec<i64>,
    pub mapped_class_ids: Vec<i64>,
    pub unmapped_class_ids: Vec<i64>,
    pub complete: bool,
}

impl MappingProgressResponse {
    #[must_use]
    pub fn new(preparation_id: i64, progress: MappingProgress) -> Self {
        let complete = progress.is_complete();
        Self {
            preparation_id,
            source_class_ids: progress.source_class_ids,
            mapped_class_ids: progress.mapped_class_ids,
            unmapped_class_ids: progress.unmapped_class_ids,
            complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentTransitionInfo {
    pub transition_id: i64,
    pub preparation_id: i64,
    pub student_id: i64,
    pub source_class_id: i64,
    pub target_class_id: Option<i64>,
    pub transition_type: TransitionType,
    pub enrollment_id: Option<i64>,
    pub created_at: String,
}

impl From<StudentTransition> for StudentTransitionInfo {
    fn from(transition: StudentTransition) -> Self {
        Self {
            transition_id: transition.transition_id,
            preparation_id: transition.preparation_id,
            student_id: transition.student_id,
            source_class_id: transition.source_class_id,
            target_class_id: transition.target_class_id,
            transition_type: transition.transition_type,
            enrollment_id: transition.enrollment_id,
            created_at: transition.created_at,
        }
    }
}

/// Result of a promotion batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoteResponse {
    /// Audit rows written by this batch.
    pub applied: usize,
    /// Submitted students that were already recorded.
    pub skipped: usize,
    pub enrollments_created: usize,
    /// Source-class students still without an audit row.
    pub outstanding_students: Vec<i64>,
    pub preparation: PreparationInfo,
}
