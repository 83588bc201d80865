// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::Enrollment;

use crate::data_models::EnrollmentRow;
use crate::diesel_schema::enrollments;
use crate::error::PersistenceError;

/// Lists the enrollments of one class in one year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_enrollments(
    conn: &mut SqliteConnection,
    class_id: i64,
    year_id: i64,
) -> Result<Vec<Enrollment>, PersistenceError> {
    Ok(enrollments::table
        .filter(enrollments::class_id.eq(class_id))
        .filter(enrollments::year_id.eq(year_id))
        .order(enrollments::enrollment_id.asc())
        .select(EnrollmentRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Enrollment::from)
        .collect())
}

/// Lists the enrollments of several classes of one year, in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_enrollments_for_classes(
    conn: &mut SqliteConnection,
    class_ids: &[i64],
    year_id: i64,
) -> Result<Vec<Enrollment>, PersistenceError> {
    if class_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(enrollments::table
        .filter(enrollments::class_id.eq_any(class_ids))
        .filter(enrollments::year_id.eq(year_id))
        .order(enrollments::enrollment_id.asc())
        .select(EnrollmentRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Enrollment::from)
        .collect())
}

/// Lists the distinct students actively enrolled in any of `class_ids`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_active_students(
    conn: &mut SqliteConnection,
    class_ids: &[i64],
    year_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    if class_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(enrollments::table
        .filter(enrollments::class_id.eq_any(class_ids))
        .filter(enrollments::year_id.eq(year_id))
        .filter(enrollments::is_active.eq(1))
        .select(enrollments::student_id)
        .distinct()
        .order(enrollments::student_id.asc())
        .load(conn)?)
}

/// Counts the enrollments of a year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_year_enrollments(
    conn: &mut SqliteConnection,
    year_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(enrollments::table
        .filter(enrollments::year_id.eq(year_id))
        .count()
        .get_result(conn)?)
}
