// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Preparation creation and status changes.
//!
//! Status only moves through a compare-and-set update: the row is updated
//! only while it still holds the expected status, and zero affected rows
//! means another caller got there first.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover::MappingProgress;
use rollover_domain::{Preparation, PreparationStatus};
use tracing::{debug, info, warn};

use crate::data_models::{
    NewPreparationRow, PreparationRow, PreparationStatusChange, now_timestamp,
};
use crate::diesel_schema::preparations;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a new preparation in status `initialized`.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the school's source year
/// already has a non-completed preparation.
pub fn insert_preparation(
    conn: &mut SqliteConnection,
    school_id: i64,
    source_year_id: i64,
    target_year_id: i64,
) -> Result<Preparation, PersistenceError> {
    let initialized_at: String = now_timestamp()?;
    let row: PreparationRow = diesel::insert_into(preparations::table)
        .values(NewPreparationRow {
            school_id,
            source_year_id,
            target_year_id,
            status: PreparationStatus::Initialized.as_str(),
            initialized_at: &initialized_at,
        })
        .returning(PreparationRow::as_returning())
        .get_result(conn)?;
    row.into_domain()
}

/// Returns the open preparation of a school's source year, creating it if
/// none exists.
///
/// The insert is attempted and a uniqueness violation on the open
/// preparation index resolves to the row the other caller created.
///
/// # Returns
///
/// The preparation and whether this call created it.
///
/// # Errors
///
/// Returns an error if the lookup or insert fails.
pub fn get_or_create_preparation(
    conn: &mut SqliteConnection,
    school_id: i64,
    source_year_id: i64,
    target_year_id: i64,
) -> Result<(Preparation, bool), PersistenceError> {
    if let Some(existing) =
        queries::preparations::find_open_preparation(conn, school_id, source_year_id)?
    {
        return Ok((existing, false));
    }

    match insert_preparation(conn, school_id, source_year_id, target_year_id) {
        Ok(preparation) => {
            info!(
                preparation_id = preparation.preparation_id,
                school_id, source_year_id, target_year_id, "Created preparation"
            );
            Ok((preparation, true))
        }
        Err(PersistenceError::UniqueViolation(msg)) => {
            debug!(school_id, source_year_id, "Preparation created concurrently: {msg}");
            let existing: Preparation =
                queries::preparations::find_open_preparation(conn, school_id, source_year_id)?
                    .ok_or_else(|| {
                        PersistenceError::NotFound(format!(
                            "open preparation for school {school_id}, year {source_year_id}"
                        ))
                    })?;
            Ok((existing, false))
        }
        Err(err) => Err(err),
    }
}

/// Moves a preparation from `expected` to `next`.
///
/// # Errors
///
/// Returns `PersistenceError::DomainViolation` if `next` is not the
/// successor of `expected`, `PersistenceError::StateConflict` if the stored
/// status is not `expected`, or `PersistenceError::NotFound` if the
/// preparation does not exist.
pub fn compare_and_set_status(
    conn: &mut SqliteConnection,
    preparation_id: i64,
    expected: PreparationStatus,
    next: PreparationStatus,
) -> Result<Preparation, PersistenceError> {
    expected.validate_transition(next)?;

    let at: String = now_timestamp()?;
    let updated: usize = diesel::update(
        preparations::table
            .filter(preparations::preparation_id.eq(preparation_id))
            .filter(preparations::status.eq(expected.as_str())),
    )
    .set(PreparationStatusChange::entering(next, &at))
    .execute(conn)?;

    if updated == 0 {
        let current: Preparation = queries::preparations::get_preparation(conn, preparation_id)?;
        warn!(
            preparation_id,
            expected = %expected,
            actual = %current.status,
            "Status compare-and-set lost"
        );
        return Err(PersistenceError::StateConflict {
            preparation_id,
            expected,
            actual: current.status,
        });
    }

    info!(preparation_id, from = %expected, to = %next, "Advanced preparation");
    queries::preparations::get_preparation(conn, preparation_id)
}

/// Returns the mapping progress over the source year's active classes.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn source_mapping_progress(
    conn: &mut SqliteConnection,
    preparation: &Preparation,
) -> Result<MappingProgress, PersistenceError> {
    let source_class_ids: Vec<i64> =
        queries::classes::list_transitionable_class_ids(conn, preparation.source_year_id)?;
    let mappings = queries::mappings::list_mappings(conn, preparation.preparation_id)?;
    Ok(rollover::mapping_progress(&source_class_ids, &mappings))
}

/// Checks the precondition of a step and then moves the preparation.
///
/// - `classes_created` needs at least one active, non-archived class in the
///   target year.
/// - `mapping_done` needs every active source class mapped exactly once.
/// - `completed` is only entered by a promotion batch.
///
/// Must run inside a transaction.
///
/// # Errors
///
/// Returns `PersistenceError::StateConflict` on a stale `expected`,
/// `PersistenceError::NoTargetClasses`, `PersistenceError::IncompleteMapping`
/// or `PersistenceError::StepClosed` when a precondition does not hold.
pub fn advance_preparation(
    conn: &mut SqliteConnection,
    preparation_id: i64,
    expected: PreparationStatus,
    next: PreparationStatus,
) -> Result<Preparation, PersistenceError> {
    let preparation: Preparation = queries::preparations::get_preparation(conn, preparation_id)?;
    if preparation.status != expected {
        return Err(PersistenceError::StateConflict {
            preparation_id,
            expected,
            actual: preparation.status,
        });
    }
    expected.validate_transition(next)?;

    match next {
        PreparationStatus::ClassesCreated => {
            let target_classes: i64 =
                queries::classes::count_transitionable_classes(conn, preparation.target_year_id)?;
            if target_classes == 0 {
                return Err(PersistenceError::NoTargetClasses {
                    target_year_id: preparation.target_year_id,
                });
            }
        }
        PreparationStatus::MappingDone => {
            let progress: MappingProgress = source_mapping_progress(conn, &preparation)?;
            if !progress.is_complete() {
                return Err(PersistenceError::IncompleteMapping {
                    preparation_id,
                    unmapped_class_ids: progress.unmapped_class_ids,
                });
            }
        }
        PreparationStatus::Completed => {
            return Err(PersistenceError::StepClosed {
                preparation_id,
                status: preparation.status,
                operation: String::from("completion outside of a promotion batch"),
            });
        }
        PreparationStatus::Initialized => {}
    }

    compare_and_set_status(conn, preparation_id, expected, next)
}
