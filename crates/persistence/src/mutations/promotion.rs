// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The promotion batch.
//!
//! A batch is applied in one transaction: enrollments in the target year,
//! one audit row per student, and the move to `completed` once every
//! student of the source classes is recorded. Students that already have an
//! audit row for the preparation are skipped, which makes resubmission safe.

use std::collections::HashSet;

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover::{MappingProgress, PromotionPlan, outstanding_students, plan_promotion};
use rollover_domain::{Preparation, PreparationStatus, ValidatedTransition};
use tracing::{debug, info};

use crate::data_models::{NewStudentTransitionRow, now_timestamp};
use crate::diesel_schema::student_transitions;
use crate::error::PersistenceError;
use crate::mutations::enrollments::insert_enrollment;
use crate::mutations::preparations::{compare_and_set_status, source_mapping_progress};
use crate::queries;

/// What a promotion batch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Audit rows written by this batch.
    pub applied: usize,
    /// Submitted students that were already recorded.
    pub skipped: usize,
    /// Enrollments written by this batch.
    pub enrollments_created: usize,
    /// Source-class students still without an audit row, ascending.
    pub outstanding_students: Vec<i64>,
    /// The preparation after the batch.
    pub preparation: Preparation,
}

/// Rejects a batch whose preparation is not in `mapping_done`.
///
/// Before `mapping_done`, unmapped source classes are reported as such.
fn reject_status(
    conn: &mut SqliteConnection,
    preparation: &Preparation,
) -> Result<(), PersistenceError> {
    if preparation.status < PreparationStatus::MappingDone {
        let progress: MappingProgress = source_mapping_progress(conn, preparation)?;
        if !progress.is_complete() {
            return Err(PersistenceError::IncompleteMapping {
                preparation_id: preparation.preparation_id,
                unmapped_class_ids: progress.unmapped_class_ids,
            });
        }
    }
    Err(PersistenceError::StateConflict {
        preparation_id: preparation.preparation_id,
        expected: PreparationStatus::MappingDone,
        actual: preparation.status,
    })
}

/// Applies a validated promotion batch. Must run inside a transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `preparation_id` - The preparation the batch belongs to
/// * `transitions` - A batch validated against the preparation's classes
///
/// # Errors
///
/// Returns `PersistenceError::IncompleteMapping` or
/// `PersistenceError::StateConflict` when the preparation is not ready, and
/// a storage error when a write fails. The caller's transaction rolls back
/// every write on error.
pub fn apply_promotion(
    conn: &mut SqliteConnection,
    preparation_id: i64,
    transitions: Vec<ValidatedTransition>,
) -> Result<ApplyOutcome, PersistenceError> {
    let preparation: Preparation = queries::preparations::get_preparation(conn, preparation_id)?;
    let recorded: HashSet<i64> = queries::transitions::recorded_students(conn, preparation_id)?;
    let plan: PromotionPlan = plan_promotion(preparation.target_year_id, transitions, &recorded);

    match preparation.status {
        PreparationStatus::MappingDone => {}
        PreparationStatus::Completed if plan.is_empty() => {
            debug!(
                preparation_id,
                skipped = plan.already_recorded.len(),
                "Batch resubmitted after completion"
            );
            return Ok(ApplyOutcome {
                applied: 0,
                skipped: plan.already_recorded.len(),
                enrollments_created: 0,
                outstanding_students: Vec::new(),
                preparation,
            });
        }
        _ => reject_status(conn, &preparation)?,
    }

    let created_at: String = now_timestamp()?;
    let mut rows: Vec<NewStudentTransitionRow<'_>> = Vec::with_capacity(plan.to_apply.len());
    let enrollments_created: usize = plan.enrollment_count();

    for transition in &plan.to_apply {
        let enrollment_id: Option<i64> = match transition.target_class_id {
            Some(target_class_id) if transition.transition_type.requires_target_class() => {
                let enrollment = insert_enrollment(
                    conn,
                    transition.student_id,
                    target_class_id,
                    plan.target_year_id,
                    &created_at,
                )?;
                Some(enrollment.enrollment_id)
            }
            _ => None,
        };

        rows.push(NewStudentTransitionRow {
            preparation_id,
            student_id: transition.student_id,
            source_class_id: transition.source_class_id,
            target_class_id: transition.target_class_id,
            transition_type: transition.transition_type.as_str(),
            enrollment_id,
            created_at: &created_at,
        });
    }

    if !rows.is_empty() {
        diesel::insert_into(student_transitions::table)
            .values(&rows)
            .execute(conn)?;
    }

    let mut now_recorded: HashSet<i64> = recorded;
    now_recorded.extend(plan.to_apply.iter().map(|t| t.student_id));

    let source_class_ids: Vec<i64> =
        queries::classes::list_transitionable_class_ids(conn, preparation.source_year_id)?;
    let enrolled: Vec<i64> = queries::enrollments::list_active_students(
        conn,
        &source_class_ids,
        preparation.source_year_id,
    )?;
    let outstanding: Vec<i64> = outstanding_students(&enrolled, &now_recorded);

    let preparation: Preparation = if outstanding.is_empty() {
        compare_and_set_status(
            conn,
            preparation_id,
            PreparationStatus::MappingDone,
            PreparationStatus::Completed,
        )?
    } else {
        preparation
    };

    info!(
        preparation_id,
        applied = rows.len(),
        skipped = plan.already_recorded.len(),
        enrollments_created,
        outstanding = outstanding.len(),
        status = %preparation.status,
        "Applied promotion batch"
    );

    Ok(ApplyOutcome {
        applied: rows.len(),
        skipped: plan.already_recorded.len(),
        enrollments_created,
        outstanding_students: outstanding,
        preparation,
    })
}
