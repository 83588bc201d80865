// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Administration of the school-year registry and the class roster.
//!
//! These operations seed the stores the workflow reads from.

use rollover_domain::{NewSchoolYear, SchoolClass, SchoolYear, parse_date, validate_class_name};
use rollover_persistence::{Persistence, PersistenceError, RosterSource, SchoolYearRegistry};
use time::Date;
use tracing::info;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    ClassInfo, CreateEnrollmentRequest, CreateRosterClassRequest, CreateYearRequest,
    EnrollmentInfo, SchoolYearInfo,
};

fn parse_field_date(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_date(value).map_err(|e| ApiError::invalid(field, e.to_string()))
}

fn load_year(persistence: &mut Persistence, year_id: i64) -> Result<SchoolYear, ApiError> {
    persistence.get_year(year_id).map_err(|e| match e {
        PersistenceError::NotFound(_) => ApiError::NotFound {
            resource_type: String::from("School year"),
            message: format!("School year {year_id} does not exist"),
        },
        other => translate_persistence_error(other),
    })
}

fn load_class(persistence: &mut Persistence, class_id: i64) -> Result<SchoolClass, ApiError> {
    persistence.get_class(class_id).map_err(|e| match e {
        PersistenceError::NotFound(_) => ApiError::NotFound {
            resource_type: String::from("Class"),
            message: format!("Class {class_id} does not exist"),
        },
        other => translate_persistence_error(other),
    })
}

/// Creates a school year.
///
/// # Errors
///
/// Returns `ApiError::ValidationError` if a date is malformed, the range is
/// empty, or the school already has a year with this label.
pub fn create_year(
    persistence: &mut Persistence,
    request: &CreateYearRequest,
) -> Result<SchoolYearInfo, ApiError> {
    let start_date: Date = parse_field_date("start_date", &request.start_date)?;
    let end_date: Date = parse_field_date("end_date", &request.end_date)?;

    let mut year: NewSchoolYear =
        NewSchoolYear::new(request.school_id, &request.label, start_date, end_date)
            .map_err(translate_domain_error)?;
    year.is_current = request.is_current;
    year.is_next = request.is_next;

    let created: SchoolYear = persistence.create_year(&year).map_err(|e| match e {
        PersistenceError::UniqueViolation(_) => ApiError::invalid(
            "label",
            format!(
                "School {} already has a year labelled '{}'",
                year.school_id, year.label
            ),
        ),
        other => translate_persistence_error(other),
    })?;

    info!(
        year_id = created.year_id,
        school_id = created.school_id,
        label = %created.label,
        "Created school year"
    );
    Ok(SchoolYearInfo::from(created))
}

/// Lists a school's years by start date.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_years(
    persistence: &mut Persistence,
    school_id: i64,
) -> Result<Vec<SchoolYearInfo>, ApiError> {
    Ok(persistence
        .list_years(school_id)?
        .into_iter()
        .map(SchoolYearInfo::from)
        .collect())
}

/// Adds a class to a year.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the year does not exist, or
/// `ApiError::ValidationError` for a blank name.
pub fn create_roster_class(
    persistence: &mut Persistence,
    year_id: i64,
    request: &CreateRosterClassRequest,
) -> Result<ClassInfo, ApiError> {
    let name: String = validate_class_name(&request.name).map_err(translate_domain_error)?;
    load_year(persistence, year_id)?;
    let class: SchoolClass =
        persistence.create_class(year_id, &name, request.is_active, request.is_archived)?;
    Ok(ClassInfo::from(class))
}

/// Lists every class of a year.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the year does not exist.
pub fn list_year_classes(
    persistence: &mut Persistence,
    year_id: i64,
) -> Result<Vec<ClassInfo>, ApiError> {
    load_year(persistence, year_id)?;
    Ok(persistence
        .list_classes(year_id)?
        .into_iter()
        .map(ClassInfo::from)
        .collect())
}

/// Enrolls a student in a class, in the class's year.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the class does not exist, or
/// `ApiError::ValidationError` for a non-positive student id.
pub fn create_enrollment(
    persistence: &mut Persistence,
    class_id: i64,
    request: &CreateEnrollmentRequest,
) -> Result<EnrollmentInfo, ApiError> {
    if request.student_id <= 0 {
        return Err(ApiError::invalid(
            "student_id",
            "must be a positive identifier",
        ));
    }
    let class: SchoolClass = load_class(persistence, class_id)?;
    let enrollment = persistence.create_enrollment(request.student_id, class_id, class.year_id)?;
    Ok(EnrollmentInfo::from(enrollment))
}

/// Lists the enrollments of a class.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the class does not exist.
pub fn list_class_enrollments(
    persistence: &mut Persistence,
    class_id: i64,
) -> Result<Vec<EnrollmentInfo>, ApiError> {
    let class: SchoolClass = load_class(persistence, class_id)?;
    Ok(persistence
        .list_enrollments(class_id, class.year_id)?
        .into_iter()
        .map(EnrollmentInfo::from)
        .collect())
}
