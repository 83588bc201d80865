// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types for the Diesel schema and their domain conversions.
//!
//! Booleans are stored as `0`/`1` integers, dates as `YYYY-MM-DD` text and
//! timestamps as ISO-8601 text.

use diesel::prelude::*;
use rollover_domain::{
    ClassMapping, Enrollment, NewSchoolYear, Preparation, PreparationStatus, SchoolClass,
    SchoolYear, StudentTransition, TransitionType, format_date, parse_date,
};
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::diesel_schema::{
    class_mappings, classes, enrollments, preparations, school_years, student_transitions,
};
use crate::error::PersistenceError;

/// Returns the current UTC time as an ISO-8601 timestamp.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

const fn flag(value: bool) -> i32 {
    if value { 1 } else { 0 }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = school_years)]
pub struct SchoolYearRow {
    pub year_id: i64,
    pub school_id: i64,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: i32,
    pub is_next: i32,
}

impl SchoolYearRow {
    /// # Errors
    ///
    /// Returns an error if a stored date is malformed.
    pub fn into_domain(self) -> Result<SchoolYear, PersistenceError> {
        let start_date = parse_date(&self.start_date)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        let end_date = parse_date(&self.end_date)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        Ok(SchoolYear {
            year_id: self.year_id,
            school_id: self.school_id,
            label: self.label,
            start_date,
            end_date,
            is_current: self.is_current != 0,
            is_next: self.is_next != 0,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = school_years)]
pub struct NewSchoolYearRow {
    pub school_id: i64,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: i32,
    pub is_next: i32,
}

impl From<&NewSchoolYear> for NewSchoolYearRow {
    fn from(year: &NewSchoolYear) -> Self {
        Self {
            school_id: year.school_id,
            label: year.label.clone(),
            start_date: format_date(year.start_date),
            end_date: format_date(year.end_date),
            is_current: flag(year.is_current),
            is_next: flag(year.is_next),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = classes)]
pub struct ClassRow {
    pub class_id: i64,
    pub year_id: i64,
    pub name: String,
    pub is_active: i32,
    pub is_archived: i32,
}

impl From<ClassRow> for SchoolClass {
    fn from(row: ClassRow) -> Self {
        Self {
            class_id: row.class_id,
            year_id: row.year_id,
            name: row.name,
            is_active: row.is_active != 0,
            is_archived: row.is_archived != 0,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = classes)]
pub struct NewClassRow<'a> {
    pub year_id: i64,
    pub name: &'a str,
    pub is_active: i32,
    pub is_archived: i32,
    pub created_at: &'a str,
}

impl<'a> NewClassRow<'a> {
    pub const fn new(
        year_id: i64,
        name: &'a str,
        is_active: bool,
        is_archived: bool,
        created_at: &'a str,
    ) -> Self {
        Self {
            year_id,
            name,
            is_active: flag(is_active),
            is_archived: flag(is_archived),
            created_at,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
pub struct EnrollmentRow {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub year_id: i64,
    pub is_active: i32,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Self {
            enrollment_id: row.enrollment_id,
            student_id: row.student_id,
            class_id: row.class_id,
            year_id: row.year_id,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = enrollments)]
pub struct NewEnrollmentRow<'a> {
    pub student_id: i64,
    pub class_id: i64,
    pub year_id: i64,
    pub is_active: i32,
    pub created_at: &'a str,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = preparations)]
pub struct PreparationRow {
    pub preparation_id: i64,
    pub school_id: i64,
    pub source_year_id: i64,
    pub target_year_id: i64,
    pub status: String,
    pub initialized_at: String,
    pub classes_created_at: Option<String>,
    pub mapping_done_at: Option<String>,
    pub completed_at: Option<String>,
}

impl PreparationRow {
    /// # Errors
    ///
    /// Returns an error if the stored status is not a known state.
    pub fn into_domain(self) -> Result<Preparation, PersistenceError> {
        let status: PreparationStatus = self
            .status
            .parse()
            .map_err(|e: rollover_domain::DomainError| {
                PersistenceError::ReconstructionError(e.to_string())
            })?;
        Ok(Preparation {
            preparation_id: self.preparation_id,
            school_id: self.school_id,
            source_year_id: self.source_year_id,
            target_year_id: self.target_year_id,
            status,
            initialized_at: self.initialized_at,
            classes_created_at: self.classes_created_at,
            mapping_done_at: self.mapping_done_at,
            completed_at: self.completed_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = preparations)]
pub struct NewPreparationRow<'a> {
    pub school_id: i64,
    pub source_year_id: i64,
    pub target_year_id: i64,
    pub status: &'a str,
    pub initialized_at: &'a str,
}

/// A status update together with the timestamp of the step it enters.
///
/// `None` fields are left untouched by Diesel.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = preparations)]
pub struct PreparationStatusChange<'a> {
    pub status: &'a str,
    pub classes_created_at: Option<&'a str>,
    pub mapping_done_at: Option<&'a str>,
    pub completed_at: Option<&'a str>,
}

impl<'a> PreparationStatusChange<'a> {
    pub const fn entering(status: PreparationStatus, at: &'a str) -> Self {
        let mut change = Self {
            status: status.as_str(),
            classes_created_at: None,
            mapping_done_at: None,
            completed_at: None,
        };
        match status {
            PreparationStatus::Initialized => {}
            PreparationStatus::ClassesCreated => change.classes_created_at = Some(at),
            PreparationStatus::MappingDone => change.mapping_done_at = Some(at),
            PreparationStatus::Completed => change.completed_at = Some(at),
        }
        change
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = class_mappings)]
pub struct ClassMappingRow {
    pub mapping_id: i64,
    pub preparation_id: i64,
    pub source_class_id: i64,
    pub target_class_id: i64,
}

impl From<ClassMappingRow> for ClassMapping {
    fn from(row: ClassMappingRow) -> Self {
        Self {
            mapping_id: row.mapping_id,
            preparation_id: row.preparation_id,
            source_class_id: row.source_class_id,
            target_class_id: row.target_class_id,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = class_mappings)]
pub struct NewClassMappingRow<'a> {
    pub preparation_id: i64,
    pub source_class_id: i64,
    pub target_class_id: i64,
    pub created_at: &'a str,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = student_transitions)]
pub struct StudentTransitionRow {
    pub transition_id: i64,
    pub preparation_id: i64,
    pub student_id: i64,
    pub source_class_id: i64,
    pub target_class_id: Option<i64>,
    pub transition_type: String,
    pub enrollment_id: Option<i64>,
    pub created_at: String,
}

impl StudentTransitionRow {
    /// # Errors
    ///
    /// Returns an error if the stored transition type is unknown.
    pub fn into_domain(self) -> Result<StudentTransition, PersistenceError> {
        let transition_type: TransitionType = self
            .transition_type
            .parse()
            .map_err(|e: rollover_domain::DomainError| {
                PersistenceError::ReconstructionError(e.to_string())
            })?;
        Ok(StudentTransition {
            transition_id: self.transition_id,
            preparation_id: self.preparation_id,
            student_id: self.student_id,
            source_class_id: self.source_class_id,
            target_class_id: self.target_class_id,
            transition_type,
            enrollment_id: self.enrollment_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = student_transitions)]
pub struct NewStudentTransitionRow<'a> {
    pub preparation_id: i64,
    pub student_id: i64,
    pub source_class_id: i64,
    pub target_class_id: Option<i64>,
    pub transition_type: &'a str,
    pub enrollment_id: Option<i64>,
    pub created_at: &'a str,
}
