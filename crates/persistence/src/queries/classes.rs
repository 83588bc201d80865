// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::SchoolClass;

use crate::data_models::ClassRow;
use crate::diesel_schema::classes;
use crate::error::PersistenceError;

/// Retrieves a class by ID, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_class(
    conn: &mut SqliteConnection,
    class_id: i64,
) -> Result<Option<SchoolClass>, PersistenceError> {
    Ok(classes::table
        .filter(classes::class_id.eq(class_id))
        .select(ClassRow::as_select())
        .first(conn)
        .optional()?
        .map(SchoolClass::from))
}

/// Retrieves a class by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the class does not exist.
pub fn get_class(conn: &mut SqliteConnection, class_id: i64) -> Result<SchoolClass, PersistenceError> {
    find_class(conn, class_id)?
        .ok_or_else(|| PersistenceError::NotFound(format!("class {class_id}")))
}

/// Lists every class of a year, in creation order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_classes(
    conn: &mut SqliteConnection,
    year_id: i64,
) -> Result<Vec<SchoolClass>, PersistenceError> {
    Ok(classes::table
        .filter(classes::year_id.eq(year_id))
        .order(classes::class_id.asc())
        .select(ClassRow::as_select())
        .load(conn)?
        .into_iter()
        .map(SchoolClass::from)
        .collect())
}

/// Lists the IDs of the active, non-archived classes of a year.
///
/// These are the classes a year transition must account for.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_transitionable_class_ids(
    conn: &mut SqliteConnection,
    year_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(classes::table
        .filter(classes::year_id.eq(year_id))
        .filter(classes::is_active.eq(1))
        .filter(classes::is_archived.eq(0))
        .order(classes::class_id.asc())
        .select(classes::class_id)
        .load(conn)?)
}

/// Counts the active, non-archived classes of a year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_transitionable_classes(
    conn: &mut SqliteConnection,
    year_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(classes::table
        .filter(classes::year_id.eq(year_id))
        .filter(classes::is_active.eq(1))
        .filter(classes::is_archived.eq(0))
        .count()
        .get_result(conn)?)
}
