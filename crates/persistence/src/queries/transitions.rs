// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::StudentTransition;

use crate::data_models::StudentTransitionRow;
use crate::diesel_schema::student_transitions;
use crate::error::PersistenceError;

/// Lists the audit rows of a preparation, in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_transitions(
    conn: &mut SqliteConnection,
    preparation_id: i64,
) -> Result<Vec<StudentTransition>, PersistenceError> {
    student_transitions::table
        .filter(student_transitions::preparation_id.eq(preparation_id))
        .order(student_transitions::transition_id.asc())
        .select(StudentTransitionRow::as_select())
        .load(conn)?
        .into_iter()
        .map(StudentTransitionRow::into_domain)
        .collect()
}

/// Returns the students that already have an audit row for a preparation.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn recorded_students(
    conn: &mut SqliteConnection,
    preparation_id: i64,
) -> Result<HashSet<i64>, PersistenceError> {
    let ids: Vec<i64> = student_transitions::table
        .filter(student_transitions::preparation_id.eq(preparation_id))
        .select(student_transitions::student_id)
        .load(conn)?;
    Ok(ids.into_iter().collect())
}
