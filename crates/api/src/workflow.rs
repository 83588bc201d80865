// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The preparation state machine.
//!
//! A preparation moves `initialized` → `classes_created` → `mapping_done` →
//! `completed`, one step at a time, and never back. The stored status is
//! the single source of truth for which step a school is on.

use rollover_domain::{
    NewSchoolYear, Preparation, PreparationStatus, SchoolYear, validate_target_year,
};
use rollover_persistence::{Persistence, PersistenceError, SchoolYearRegistry};
use tracing::{debug, info};

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AdvanceStatusRequest, GetOrCreatePreparationRequest, GetOrCreatePreparationResponse,
    PreparationInfo,
};

fn year_not_found(year_id: i64) -> ApiError {
    ApiError::NotFound {
        resource_type: String::from("School year"),
        message: format!("School year {year_id} does not exist"),
    }
}

/// Loads the source year and checks that it belongs to the school.
fn load_source_year(
    persistence: &mut Persistence,
    school_id: i64,
    source_year_id: i64,
) -> Result<SchoolYear, ApiError> {
    let source: SchoolYear = persistence.get_year(source_year_id).map_err(|e| match e {
        PersistenceError::NotFound(_) => year_not_found(source_year_id),
        other => translate_persistence_error(other),
    })?;
    if source.school_id != school_id {
        return Err(ApiError::NotFound {
            resource_type: String::from("School year"),
            message: format!("School year {source_year_id} does not belong to school {school_id}"),
        });
    }
    Ok(source)
}

/// Picks the target year of a new preparation.
///
/// An explicit year must exist, belong to the school and start after the
/// source year. Otherwise the school's next year is used, and if there is
/// none the successor of the source year is created.
fn resolve_target_year(
    persistence: &mut Persistence,
    source: &SchoolYear,
    explicit: Option<i64>,
) -> Result<SchoolYear, ApiError> {
    let target: SchoolYear = match explicit {
        Some(target_year_id) => persistence.get_year(target_year_id).map_err(|e| match e {
            PersistenceError::NotFound(_) => ApiError::invalid(
                "target_year_id",
                format!("School year {target_year_id} does not exist"),
            ),
            other => translate_persistence_error(other),
        })?,
        None => {
            if let Some(next) = persistence.find_next_year(source.year_id)? {
                debug!(year_id = next.year_id, "Using existing next year");
                next
            } else {
                let successor: NewSchoolYear = source.successor().map_err(translate_domain_error)?;
                let created: SchoolYear = persistence.get_or_create_year(&successor)?;
                info!(
                    year_id = created.year_id,
                    label = %created.label,
                    "Auto-created target year"
                );
                created
            }
        }
    };

    validate_target_year(source, &target).map_err(translate_domain_error)?;
    Ok(target)
}

/// Returns the open preparation of a school's source year, creating it if
/// none exists.
///
/// Concurrent calls for the same school and year return the same
/// preparation.
///
/// # Errors
///
/// Returns an error if:
/// - The source year does not exist or belongs to another school
/// - The explicit target year is unknown or does not follow the source year
pub fn get_or_create_preparation(
    persistence: &mut Persistence,
    request: &GetOrCreatePreparationRequest,
) -> Result<GetOrCreatePreparationResponse, ApiError> {
    let source: SchoolYear =
        load_source_year(persistence, request.school_id, request.source_year_id)?;

    if let Some(existing) = persistence.find_open_preparation(request.school_id, source.year_id)? {
        debug!(
            preparation_id = existing.preparation_id,
            "Returning open preparation"
        );
        return Ok(GetOrCreatePreparationResponse {
            preparation: PreparationInfo::from(existing),
            created: false,
        });
    }

    let target: SchoolYear = resolve_target_year(persistence, &source, request.target_year_id)?;
    let (preparation, created): (Preparation, bool) = persistence.get_or_create_preparation(
        request.school_id,
        source.year_id,
        target.year_id,
    )?;

    Ok(GetOrCreatePreparationResponse {
        preparation: PreparationInfo::from(preparation),
        created,
    })
}

/// Retrieves a preparation.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the preparation does not exist.
pub fn get_preparation(
    persistence: &mut Persistence,
    preparation_id: i64,
) -> Result<PreparationInfo, ApiError> {
    load_preparation(persistence, preparation_id).map(PreparationInfo::from)
}

/// Loads a preparation, reporting a missing one as `ApiError::NotFound`.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the preparation does not exist.
pub fn load_preparation(
    persistence: &mut Persistence,
    preparation_id: i64,
) -> Result<Preparation, ApiError> {
    persistence
        .get_preparation(preparation_id)
        .map_err(|e| match e {
            PersistenceError::NotFound(_) => ApiError::NotFound {
                resource_type: String::from("Preparation"),
                message: format!("Preparation {preparation_id} does not exist"),
            },
            other => translate_persistence_error(other),
        })
}

fn parse_status(field: &str, value: &str) -> Result<PreparationStatus, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::invalid(field, format!("'{value}' is not a preparation status")))
}

/// Moves a preparation to the next status.
///
/// Succeeds only if the stored status equals `expected_status`, the
/// requested status is its single successor, and the step's precondition
/// holds. `completed` is reached only by a promotion batch.
///
/// # Errors
///
/// Returns `ApiError::StateConflict` on a stale or illegal transition,
/// `ApiError::IncompleteMapping` if source classes are unmapped, or
/// `ApiError::ValidationError` if the target year has no classes.
pub fn advance_status(
    persistence: &mut Persistence,
    preparation_id: i64,
    request: &AdvanceStatusRequest,
) -> Result<PreparationInfo, ApiError> {
    let expected: PreparationStatus = parse_status("expected_status", &request.expected_status)?;
    let next: PreparationStatus = parse_status("next_status", &request.next_status)?;

    load_preparation(persistence, preparation_id)?;
    let preparation: Preparation = persistence.advance_preparation(preparation_id, expected, next)?;

    info!(
        preparation_id,
        status = %preparation.status,
        "Preparation advanced"
    );
    Ok(PreparationInfo::from(preparation))
}
