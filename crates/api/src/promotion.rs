// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student promotion into the target year.

use std::collections::HashSet;

use rollover::MappingProgress;
use rollover_domain::{
    DraftTransition, Preparation, PreparationStatus, ValidatedTransition, validate_transition_batch,
};
use rollover_persistence::{ApplyOutcome, Persistence};
use tracing::{debug, info};

use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    PreparationInfo, PromoteRequest, PromoteResponse, StudentTransitionInfo,
};
use crate::workflow::load_preparation;

/// Rejects a batch for a preparation that has not reached `mapping_done`.
fn ensure_promotable(
    persistence: &mut Persistence,
    preparation: &Preparation,
) -> Result<(), ApiError> {
    if preparation.status >= PreparationStatus::MappingDone {
        return Ok(());
    }

    let progress: MappingProgress = persistence.mapping_progress(preparation.preparation_id)?;
    if !progress.is_complete() {
        return Err(ApiError::IncompleteMapping {
            preparation_id: preparation.preparation_id,
            unmapped_class_ids: progress.unmapped_class_ids,
        });
    }

    Err(ApiError::StateConflict {
        message: format!(
            "Preparation {} is in status '{}', expected '{}'",
            preparation.preparation_id,
            preparation.status,
            PreparationStatus::MappingDone
        ),
        expected: Some(PreparationStatus::MappingDone.to_string()),
        actual: Some(preparation.status.to_string()),
    })
}

/// Builds one `promoted` draft per student of each mapped source class.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the preparation does not exist.
pub fn default_drafts(
    persistence: &mut Persistence,
    preparation_id: i64,
) -> Result<Vec<DraftTransition>, ApiError> {
    let preparation: Preparation = load_preparation(persistence, preparation_id)?;
    let mappings = persistence.list_mappings(preparation_id)?;
    let source_class_ids: Vec<i64> = mappings.iter().map(|m| m.source_class_id).collect();
    let enrollments = persistence
        .list_enrollments_for_classes(&source_class_ids, preparation.source_year_id)?;

    let drafts: Vec<DraftTransition> = rollover::default_drafts(&mappings, &enrollments);
    debug!(preparation_id, drafts = drafts.len(), "Built default drafts");
    Ok(drafts)
}

/// Validates a batch of transitions and applies it atomically.
///
/// The whole batch is rejected if any entry is invalid. Students already
/// recorded for the preparation are skipped, so a failed or partial batch
/// can be resubmitted as is or as a superset.
///
/// # Errors
///
/// Returns an error if:
/// - Any entry is invalid (`ValidationError`, one violation per field)
/// - Source classes are unmapped (`IncompleteMapping`)
/// - The preparation is not in `mapping_done` (`StateConflict`)
/// - A write failed and the batch was rolled back (`PartialApplyFailure`)
pub fn promote(
    persistence: &mut Persistence,
    preparation_id: i64,
    request: &PromoteRequest,
) -> Result<PromoteResponse, ApiError> {
    let preparation: Preparation = load_preparation(persistence, preparation_id)?;
    ensure_promotable(persistence, &preparation)?;

    let source_class_ids: HashSet<i64> = persistence
        .list_transitionable_class_ids(preparation.source_year_id)?
        .into_iter()
        .collect();
    let target_class_ids: HashSet<i64> = persistence
        .list_transitionable_class_ids(preparation.target_year_id)?
        .into_iter()
        .collect();

    let validated: Vec<ValidatedTransition> =
        validate_transition_batch(&request.transitions, &source_class_ids, &target_class_ids)
            .map_err(translate_domain_error)?;

    let outcome: ApplyOutcome = persistence.apply_promotion(preparation_id, validated)?;

    info!(
        preparation_id,
        applied = outcome.applied,
        skipped = outcome.skipped,
        enrollments = outcome.enrollments_created,
        outstanding = outcome.outstanding_students.len(),
        status = %outcome.preparation.status,
        "Promotion batch applied"
    );

    Ok(PromoteResponse {
        applied: outcome.applied,
        skipped: outcome.skipped,
        enrollments_created: outcome.enrollments_created,
        outstanding_students: outcome.outstanding_students,
        preparation: PreparationInfo::from(outcome.preparation),
    })
}

/// Lists the recorded transitions of a preparation.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the preparation does not exist.
pub fn list_transitions(
    persistence: &mut Persistence,
    preparation_id: i64,
) -> Result<Vec<StudentTransitionInfo>, ApiError> {
    load_preparation(persistence, preparation_id)?;
    Ok(persistence
        .list_transitions(preparation_id)?
        .into_iter()
        .map(StudentTransitionInfo::from)
        .collect())
}
