// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollover_domain::{Preparation, validate_class_name};
use rollover_persistence::{Persistence, RosterSource};
use tracing::info;

use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{ClassInfo, CreateClassRequest};
use crate::workflow::load_preparation;

/// Copies every active, non-archived source class into the target year.
///
/// Names that already exist in the target year are skipped, so calling
/// this again creates nothing.
///
/// # Returns
///
/// The classes created by this call.
///
/// # Errors
///
/// Returns `ApiError::StateConflict` once mapping is done.
pub fn duplicate_all(
    persistence: &mut Persistence,
    preparation_id: i64,
) -> Result<Vec<ClassInfo>, ApiError> {
    load_preparation(persistence, preparation_id)?;
    let created = persistence.duplicate_classes(preparation_id)?;
    info!(preparation_id, created = created.len(), "Duplicated classes");
    Ok(created.into_iter().map(ClassInfo::from).collect())
}

/// Creates a single class in the target year.
///
/// The name is trimmed; duplicate names are allowed.
///
/// # Errors
///
/// Returns `ApiError::ValidationError` for a blank name, or
/// `ApiError::StateConflict` once mapping is done.
pub fn create_single(
    persistence: &mut Persistence,
    preparation_id: i64,
    request: &CreateClassRequest,
) -> Result<ClassInfo, ApiError> {
    let name: String = validate_class_name(&request.name).map_err(translate_domain_error)?;
    load_preparation(persistence, preparation_id)?;
    let class = persistence.create_target_class(preparation_id, &name)?;
    Ok(ClassInfo::from(class))
}

/// Lists the classes of the preparation's target year.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the preparation does not exist.
pub fn list_target_classes(
    persistence: &mut Persistence,
    preparation_id: i64,
) -> Result<Vec<ClassInfo>, ApiError> {
    let preparation: Preparation = load_preparation(persistence, preparation_id)?;
    Ok(persistence
        .list_classes(preparation.target_year_id)?
        .into_iter()
        .map(ClassInfo::from)
        .collect())
}
