// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::Enrollment;

use crate::data_models::{EnrollmentRow, NewEnrollmentRow};
use crate::diesel_schema::enrollments;
use crate::error::PersistenceError;

/// Inserts an active enrollment.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the class or year
/// does not exist.
pub fn insert_enrollment(
    conn: &mut SqliteConnection,
    student_id: i64,
    class_id: i64,
    year_id: i64,
    created_at: &str,
) -> Result<Enrollment, PersistenceError> {
    let row: EnrollmentRow = diesel::insert_into(enrollments::table)
        .values(NewEnrollmentRow {
            student_id,
            class_id,
            year_id,
            is_active: 1,
            created_at,
        })
        .returning(EnrollmentRow::as_returning())
        .get_result(conn)?;
    Ok(Enrollment::from(row))
}
