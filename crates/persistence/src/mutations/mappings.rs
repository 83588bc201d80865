// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::{ClassMapping, Preparation, SchoolClass};
use tracing::info;

use crate::data_models::{ClassMappingRow, NewClassMappingRow, now_timestamp};
use crate::diesel_schema::class_mappings;
use crate::error::PersistenceError;
use crate::queries;

fn ensure_mapping_changes_allowed(preparation: &Preparation) -> Result<(), PersistenceError> {
    if preparation.status.allows_mapping_changes() {
        Ok(())
    } else {
        Err(PersistenceError::StepClosed {
            preparation_id: preparation.preparation_id,
            status: preparation.status,
            operation: String::from("mapping changes"),
        })
    }
}

/// Loads a class that a year transition can use: in `year_id`, active and
/// not archived.
fn transitionable_class_in_year(
    conn: &mut SqliteConnection,
    class_id: i64,
    year_id: i64,
    field: &str,
) -> Result<SchoolClass, PersistenceError> {
    match queries::classes::find_class(conn, class_id)? {
        Some(class) if class.year_id == year_id && class.is_transitionable() => Ok(class),
        Some(class) if class.year_id == year_id => Err(PersistenceError::InvalidReference {
            field: field.to_string(),
            message: format!("class {class_id} is archived or inactive"),
        }),
        Some(class) => Err(PersistenceError::InvalidReference {
            field: field.to_string(),
            message: format!(
                "class {class_id} belongs to year {}, not year {year_id}",
                class.year_id
            ),
        }),
        None => Err(PersistenceError::InvalidReference {
            field: field.to_string(),
            message: format!("class {class_id} does not exist"),
        }),
    }
}

/// Maps a source-year class to a target-year class.
///
/// Uniqueness per source class is left to the `UNIQUE(preparation_id,
/// source_class_id)` constraint. Must run inside a transaction.
///
/// # Errors
///
/// Returns `PersistenceError::MappingExists` if the source class is already
/// mapped, `PersistenceError::InvalidReference` if a class is not an active,
/// non-archived class of the expected year, or `PersistenceError::StepClosed` once mapping is done.
pub fn create_mapping(
    conn: &mut SqliteConnection,
    preparation_id: i64,
    source_class_id: i64,
    target_class_id: i64,
) -> Result<ClassMapping, PersistenceError> {
    let preparation: Preparation = queries::preparations::get_preparation(conn, preparation_id)?;
    ensure_mapping_changes_allowed(&preparation)?;

    transitionable_class_in_year(
        conn,
        source_class_id,
        preparation.source_year_id,
        "source_class_id",
    )?;
    transitionable_class_in_year(
        conn,
        target_class_id,
        preparation.target_year_id,
        "target_class_id",
    )?;

    let created_at: String = now_timestamp()?;
    let row: ClassMappingRow = diesel::insert_into(class_mappings::table)
        .values(NewClassMappingRow {
            preparation_id,
            source_class_id,
            target_class_id,
            created_at: &created_at,
        })
        .returning(ClassMappingRow::as_returning())
        .get_result(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::UniqueViolation(_) => PersistenceError::MappingExists {
                preparation_id,
                source_class_id,
            },
            other => other,
        })?;

    info!(
        preparation_id,
        mapping_id = row.mapping_id,
        source_class_id,
        target_class_id,
        "Created class mapping"
    );
    Ok(ClassMapping::from(row))
}

/// Deletes a mapping of a preparation. Must run inside a transaction.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the mapping does not belong to
/// the preparation, or `PersistenceError::StepClosed` once mapping is done.
pub fn delete_mapping(
    conn: &mut SqliteConnection,
    preparation_id: i64,
    mapping_id: i64,
) -> Result<(), PersistenceError> {
    let preparation: Preparation = queries::preparations::get_preparation(conn, preparation_id)?;
    ensure_mapping_changes_allowed(&preparation)?;

    let deleted: usize = diesel::delete(
        class_mappings::table
            .filter(class_mappings::mapping_id.eq(mapping_id))
            .filter(class_mappings::preparation_id.eq(preparation_id)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "mapping {mapping_id} of preparation {preparation_id}"
        )));
    }

    info!(preparation_id, mapping_id, "Deleted class mapping");
    Ok(())
}
