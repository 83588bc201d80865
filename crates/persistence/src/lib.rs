// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the academic-year rollover workflow.
//!
//! This crate stores school years, classes, enrollments, preparations,
//! class mappings and student transition audit rows in `SQLite` through
//! Diesel.
//!
//! ## Concurrency guarantees
//!
//! Correctness under concurrent callers comes from the database, not from
//! locks held in process:
//!
//! - At most one non-completed preparation per `(school_id, source_year_id)`
//!   is enforced by a partial unique index.
//! - A source class is mapped at most once per preparation by a unique
//!   constraint.
//! - Status changes are compare-and-set updates.
//! - Every multi-statement write runs in an immediate transaction, which
//!   takes the write lock before its first read.
//!
//! ## Testing
//!
//! Every call to `Persistence::new_in_memory()` gets its own shared-cache
//! in-memory database, so tests never observe each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use rollover::MappingProgress;
use rollover_domain::{
    ClassMapping, Enrollment, NewSchoolYear, Preparation, PreparationStatus, SchoolClass,
    SchoolYear, StudentTransition, ValidatedTransition,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod registry;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::ApplyOutcome;
pub use registry::{RosterSource, SchoolYearRegistry};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the rollover workflow.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may be opened on the same file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::configure_file_database(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // School Years
    // ========================================================================

    /// Creates a year, or returns the school's existing year with the same
    /// label.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_or_create_year(&mut self, year: &NewSchoolYear) -> Result<SchoolYear, PersistenceError> {
        mutations::years::get_or_create_year(&mut self.conn, year)
    }

    // ========================================================================
    // Classes & Enrollments
    // ========================================================================

    /// Creates a class in a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the year does not exist.
    pub fn create_class(
        &mut self,
        year_id: i64,
        name: &str,
        is_active: bool,
        is_archived: bool,
    ) -> Result<SchoolClass, PersistenceError> {
        mutations::classes::insert_class(&mut self.conn, year_id, name, is_active, is_archived)
    }

    /// Retrieves a class.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the class does not exist.
    pub fn get_class(&mut self, class_id: i64) -> Result<SchoolClass, PersistenceError> {
        queries::classes::get_class(&mut self.conn, class_id)
    }

    /// Lists the IDs of a year's active, non-archived classes.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_transitionable_class_ids(
        &mut self,
        year_id: i64,
    ) -> Result<Vec<i64>, PersistenceError> {
        queries::classes::list_transitionable_class_ids(&mut self.conn, year_id)
    }

    /// Lists the enrollments of several classes of one year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_enrollments_for_classes(
        &mut self,
        class_ids: &[i64],
        year_id: i64,
    ) -> Result<Vec<Enrollment>, PersistenceError> {
        queries::enrollments::list_enrollments_for_classes(&mut self.conn, class_ids, year_id)
    }

    /// Counts the enrollments of a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_year_enrollments(&mut self, year_id: i64) -> Result<i64, PersistenceError> {
        queries::enrollments::count_year_enrollments(&mut self.conn, year_id)
    }

    /// Creates a class in a preparation's target year.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StepClosed` once mapping is done.
    pub fn create_target_class(
        &mut self,
        preparation_id: i64,
        name: &str,
    ) -> Result<SchoolClass, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::classes::create_target_class(conn, preparation_id, name)
        })
    }

    /// Copies the source year's active classes into the target year.
    ///
    /// # Returns
    ///
    /// The classes created by this call; empty on a re-run.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StepClosed` once mapping is done.
    pub fn duplicate_classes(
        &mut self,
        preparation_id: i64,
    ) -> Result<Vec<SchoolClass>, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::classes::duplicate_classes(conn, preparation_id))
    }

    // ========================================================================
    // Preparations
    // ========================================================================

    /// Retrieves a preparation.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the preparation does not exist.
    pub fn get_preparation(&mut self, preparation_id: i64) -> Result<Preparation, PersistenceError> {
        queries::preparations::get_preparation(&mut self.conn, preparation_id)
    }

    /// Retrieves the non-completed preparation of a school's source year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_open_preparation(
        &mut self,
        school_id: i64,
        source_year_id: i64,
    ) -> Result<Option<Preparation>, PersistenceError> {
        queries::preparations::find_open_preparation(&mut self.conn, school_id, source_year_id)
    }

    /// Returns the open preparation of a school's source year, creating it
    /// with `target_year_id` if none exists.
    ///
    /// # Returns
    ///
    /// The preparation and whether this call created it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_or_create_preparation(
        &mut self,
        school_id: i64,
        source_year_id: i64,
        target_year_id: i64,
    ) -> Result<(Preparation, bool), PersistenceError> {
        mutations::preparations::get_or_create_preparation(
            &mut self.conn,
            school_id,
            source_year_id,
            target_year_id,
        )
    }

    /// Moves a preparation from `expected` to `next` without checking step
    /// preconditions.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StateConflict` if the stored status is not
    /// `expected`.
    pub fn compare_and_set_status(
        &mut self,
        preparation_id: i64,
        expected: PreparationStatus,
        next: PreparationStatus,
    ) -> Result<Preparation, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::preparations::compare_and_set_status(conn, preparation_id, expected, next)
        })
    }

    /// Checks the precondition of the next step and moves the preparation.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StateConflict` on a stale `expected`, or
    /// the error of the failed precondition.
    pub fn advance_preparation(
        &mut self,
        preparation_id: i64,
        expected: PreparationStatus,
        next: PreparationStatus,
    ) -> Result<Preparation, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::preparations::advance_preparation(conn, preparation_id, expected, next)
        })
    }

    // ========================================================================
    // Class Mappings
    // ========================================================================

    /// Maps a source class to a target class.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::MappingExists` if the source class is
    /// already mapped in this preparation.
    pub fn create_mapping(
        &mut self,
        preparation_id: i64,
        source_class_id: i64,
        target_class_id: i64,
    ) -> Result<ClassMapping, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::mappings::create_mapping(
                conn,
                preparation_id,
                source_class_id,
                target_class_id,
            )
        })
    }

    /// Deletes a mapping of a preparation.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the mapping does not belong to
    /// the preparation.
    pub fn delete_mapping(
        &mut self,
        preparation_id: i64,
        mapping_id: i64,
    ) -> Result<(), PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::mappings::delete_mapping(conn, preparation_id, mapping_id)
        })
    }

    /// Lists the mappings of a preparation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_mappings(
        &mut self,
        preparation_id: i64,
    ) -> Result<Vec<ClassMapping>, PersistenceError> {
        queries::mappings::list_mappings(&mut self.conn, preparation_id)
    }

    /// Reports which active source classes are mapped.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the preparation does not exist.
    pub fn mapping_progress(
        &mut self,
        preparation_id: i64,
    ) -> Result<MappingProgress, PersistenceError> {
        let preparation: Preparation =
            queries::preparations::get_preparation(&mut self.conn, preparation_id)?;
        mutations::preparations::source_mapping_progress(&mut self.conn, &preparation)
    }

    // ========================================================================
    // Promotion
    // ========================================================================

    /// Applies a validated promotion batch in one immediate transaction.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ApplyRolledBack` if a write failed; nothing
    /// of the batch is then stored. Workflow rejections
    /// (`IncompleteMapping`, `StateConflict`) are returned unchanged.
    pub fn apply_promotion(
        &mut self,
        preparation_id: i64,
        transitions: Vec<ValidatedTransition>,
    ) -> Result<ApplyOutcome, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| {
                mutations::promotion::apply_promotion(conn, preparation_id, transitions)
            })
            .map_err(|err| {
                if err.is_storage_failure() {
                    warn!(preparation_id, error = %err, "Promotion batch rolled back");
                    PersistenceError::ApplyRolledBack {
                        preparation_id,
                        reason: err.to_string(),
                    }
                } else {
                    err
                }
            })
    }

    /// Lists the audit rows of a preparation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_transitions(
        &mut self,
        preparation_id: i64,
    ) -> Result<Vec<StudentTransition>, PersistenceError> {
        queries::transitions::list_transitions(&mut self.conn, preparation_id)
    }
}
