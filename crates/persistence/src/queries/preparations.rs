// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::{Preparation, PreparationStatus};

use crate::data_models::PreparationRow;
use crate::diesel_schema::preparations;
use crate::error::PersistenceError;

/// Retrieves a preparation by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the preparation does not exist.
pub fn get_preparation(
    conn: &mut SqliteConnection,
    preparation_id: i64,
) -> Result<Preparation, PersistenceError> {
    preparations::table
        .filter(preparations::preparation_id.eq(preparation_id))
        .select(PreparationRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("preparation {preparation_id}")))?
        .into_domain()
}

/// Retrieves the non-completed preparation of a school's source year.
///
/// The partial unique index guarantees there is at most one.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_open_preparation(
    conn: &mut SqliteConnection,
    school_id: i64,
    source_year_id: i64,
) -> Result<Option<Preparation>, PersistenceError> {
    preparations::table
        .filter(preparations::school_id.eq(school_id))
        .filter(preparations::source_year_id.eq(source_year_id))
        .filter(preparations::status.ne(PreparationStatus::Completed.as_str()))
        .select(PreparationRow::as_select())
        .first(conn)
        .optional()?
        .map(PreparationRow::into_domain)
        .transpose()
}
