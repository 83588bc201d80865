// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::{SchoolYear, format_date};
use tracing::debug;

use crate::data_models::SchoolYearRow;
use crate::diesel_schema::school_years;
use crate::error::PersistenceError;

/// Retrieves a school year by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the year does not exist.
pub fn get_year(conn: &mut SqliteConnection, year_id: i64) -> Result<SchoolYear, PersistenceError> {
    find_year(conn, year_id)?
        .ok_or_else(|| PersistenceError::NotFound(format!("school year {year_id}")))
}

/// Retrieves a school year by ID, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_year(
    conn: &mut SqliteConnection,
    year_id: i64,
) -> Result<Option<SchoolYear>, PersistenceError> {
    school_years::table
        .filter(school_years::year_id.eq(year_id))
        .select(SchoolYearRow::as_select())
        .first(conn)
        .optional()?
        .map(SchoolYearRow::into_domain)
        .transpose()
}

/// Retrieves a school's year by its label.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_year_by_label(
    conn: &mut SqliteConnection,
    school_id: i64,
    label: &str,
) -> Result<Option<SchoolYear>, PersistenceError> {
    school_years::table
        .filter(school_years::school_id.eq(school_id))
        .filter(school_years::label.eq(label))
        .select(SchoolYearRow::as_select())
        .first(conn)
        .optional()?
        .map(SchoolYearRow::into_domain)
        .transpose()
}

/// Lists a school's years by start date.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_years(
    conn: &mut SqliteConnection,
    school_id: i64,
) -> Result<Vec<SchoolYear>, PersistenceError> {
    school_years::table
        .filter(school_years::school_id.eq(school_id))
        .order((school_years::start_date.asc(), school_years::year_id.asc()))
        .select(SchoolYearRow::as_select())
        .load(conn)?
        .into_iter()
        .map(SchoolYearRow::into_domain)
        .collect()
}

/// Finds the year that follows `current`.
///
/// A year of the same school flagged `is_next` and starting after `current`
/// wins. Otherwise the earliest year starting after `current` is returned.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_next_year(
    conn: &mut SqliteConnection,
    current: &SchoolYear,
) -> Result<Option<SchoolYear>, PersistenceError> {
    let current_start: String = format_date(current.start_date);

    let flagged: Option<SchoolYearRow> = school_years::table
        .filter(school_years::school_id.eq(current.school_id))
        .filter(school_years::is_next.eq(1))
        .filter(school_years::start_date.gt(&current_start))
        .order(school_years::start_date.asc())
        .select(SchoolYearRow::as_select())
        .first(conn)
        .optional()?;

    if let Some(row) = flagged {
        debug!(year_id = row.year_id, "Next year resolved by is_next flag");
        return row.into_domain().map(Some);
    }

    school_years::table
        .filter(school_years::school_id.eq(current.school_id))
        .filter(school_years::start_date.gt(&current_start))
        .order(school_years::start_date.asc())
        .select(SchoolYearRow::as_select())
        .first(conn)
        .optional()?
        .map(SchoolYearRow::into_domain)
        .transpose()
}
