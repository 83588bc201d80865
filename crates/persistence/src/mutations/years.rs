// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::{NewSchoolYear, SchoolYear};
use tracing::{debug, info};

use crate::data_models::{NewSchoolYearRow, SchoolYearRow};
use crate::diesel_schema::school_years;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a school year.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the school already has a
/// year with the same label.
pub fn insert_year(
    conn: &mut SqliteConnection,
    year: &NewSchoolYear,
) -> Result<SchoolYear, PersistenceError> {
    let row: SchoolYearRow = diesel::insert_into(school_years::table)
        .values(NewSchoolYearRow::from(year))
        .returning(SchoolYearRow::as_returning())
        .get_result(conn)?;

    info!(
        year_id = row.year_id,
        school_id = row.school_id,
        label = %row.label,
        "Created school year"
    );
    row.into_domain()
}

/// Inserts a school year, or returns the existing year with the same label.
///
/// Two callers auto-creating the same successor year both end up with the
/// row that won the `UNIQUE(school_id, label)` race.
///
/// # Errors
///
/// Returns an error if the insert fails for any other reason.
pub fn get_or_create_year(
    conn: &mut SqliteConnection,
    year: &NewSchoolYear,
) -> Result<SchoolYear, PersistenceError> {
    if let Some(existing) = queries::years::find_year_by_label(conn, year.school_id, &year.label)? {
        return Ok(existing);
    }

    match insert_year(conn, year) {
        Err(PersistenceError::UniqueViolation(msg)) => {
            debug!(label = %year.label, "Year created concurrently: {msg}");
            queries::years::find_year_by_label(conn, year.school_id, &year.label)?.ok_or_else(
                || PersistenceError::NotFound(format!("school year '{}'", year.label)),
            )
        }
        other => other,
    }
}
