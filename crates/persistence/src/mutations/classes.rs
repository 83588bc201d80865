// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Class creation for the roster and for a preparation's target year.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover::plan_duplication;
use rollover_domain::{Preparation, SchoolClass};
use tracing::{debug, info};

use crate::data_models::{ClassRow, NewClassRow, now_timestamp};
use crate::diesel_schema::classes;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a class into a year.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if the year does not exist.
pub fn insert_class(
    conn: &mut SqliteConnection,
    year_id: i64,
    name: &str,
    is_active: bool,
    is_archived: bool,
) -> Result<SchoolClass, PersistenceError> {
    let created_at: String = now_timestamp()?;
    let row: ClassRow = diesel::insert_into(classes::table)
        .values(NewClassRow::new(
            year_id,
            name,
            is_active,
            is_archived,
            &created_at,
        ))
        .returning(ClassRow::as_returning())
        .get_result(conn)?;
    debug!(class_id = row.class_id, year_id, name, "Inserted class");
    Ok(SchoolClass::from(row))
}

fn ensure_class_changes_allowed(preparation: &Preparation) -> Result<(), PersistenceError> {
    if preparation.status.allows_class_changes() {
        Ok(())
    } else {
        Err(PersistenceError::StepClosed {
            preparation_id: preparation.preparation_id,
            status: preparation.status,
            operation: String::from("class changes"),
        })
    }
}

/// Creates one class in a preparation's target year.
///
/// Must run inside a transaction.
///
/// # Errors
///
/// Returns `PersistenceError::StepClosed` once mapping is done.
pub fn create_target_class(
    conn: &mut SqliteConnection,
    preparation_id: i64,
    name: &str,
) -> Result<SchoolClass, PersistenceError> {
    let preparation: Preparation = queries::preparations::get_preparation(conn, preparation_id)?;
    ensure_class_changes_allowed(&preparation)?;

    let class: SchoolClass = insert_class(conn, preparation.target_year_id, name, true, false)?;
    info!(
        preparation_id,
        class_id = class.class_id,
        name = %class.name,
        "Created target class"
    );
    Ok(class)
}

/// Copies the source year's active classes into the target year.
///
/// Names already held by an active, non-archived target class are skipped,
/// so a re-run creates nothing. An archived class does not block its name. Must run inside a transaction.
///
/// # Returns
///
/// The classes created by this call.
///
/// # Errors
///
/// Returns `PersistenceError::StepClosed` once mapping is done.
pub fn duplicate_classes(
    conn: &mut SqliteConnection,
    preparation_id: i64,
) -> Result<Vec<SchoolClass>, PersistenceError> {
    let preparation: Preparation = queries::preparations::get_preparation(conn, preparation_id)?;
    ensure_class_changes_allowed(&preparation)?;

    let source_classes: Vec<SchoolClass> =
        queries::classes::list_classes(conn, preparation.source_year_id)?;
    let existing_names: Vec<String> =
        queries::classes::list_classes(conn, preparation.target_year_id)?
            .into_iter()
            .filter(SchoolClass::is_transitionable)
            .map(|c| c.name)
            .collect();

    let names: Vec<String> = plan_duplication(&source_classes, &existing_names);
    let mut created: Vec<SchoolClass> = Vec::with_capacity(names.len());
    for name in &names {
        created.push(insert_class(
            conn,
            preparation.target_year_id,
            name,
            true,
            false,
        )?);
    }

    info!(
        preparation_id,
        source_year_id = preparation.source_year_id,
        target_year_id = preparation.target_year_id,
        created = created.len(),
        existing = existing_names.len(),
        "Duplicated source classes"
    );
    Ok(created)
}
