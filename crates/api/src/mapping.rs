// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollover_persistence::Persistence;

use crate::error::ApiError;
use crate::request_response::{ClassMappingInfo, CreateMappingRequest, MappingProgressResponse};
use crate::workflow::load_preparation;

/// Maps a source-year class to a target-year class.
///
/// # Errors
///
/// Returns an error if:
/// - The source class is already mapped (`UniqueMappingViolation`)
/// - Either class is not in the expected year (`ValidationError`)
/// - Mapping is already done (`StateConflict`)
pub fn create_mapping(
    persistence: &mut Persistence,
    preparation_id: i64,
    request: &CreateMappingRequest,
) -> Result<ClassMappingInfo, ApiError> {
    load_preparation(persistence, preparation_id)?;
    let mapping = persistence.create_mapping(
        preparation_id,
        request.source_class_id,
        request.target_class_id,
    )?;
    Ok(ClassMappingInfo::from(mapping))
}

/// Deletes a mapping while mapping is still open.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the mapping is not part of the
/// preparation, or `ApiError::StateConflict` once mapping is done.
pub fn delete_mapping(
    persistence: &mut Persistence,
    preparation_id: i64,
    mapping_id: i64,
) -> Result<(), ApiError> {
    load_preparation(persistence, preparation_id)?;
    persistence
        .delete_mapping(preparation_id, mapping_id)
        .map_err(ApiError::from)
}

/// Lists the mappings of a preparation.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the preparation does not exist.
pub fn list_mappings(
    persistence: &mut Persistence,
    preparation_id: i64,
) -> Result<Vec<ClassMappingInfo>, ApiError> {
    load_preparation(persistence, preparation_id)?;
    Ok(persistence
        .list_mappings(preparation_id)?
        .into_iter()
        .map(ClassMappingInfo::from)
        .collect())
}

/// Returns true iff each of `source_class_ids` has exactly one mapping.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the preparation does not exist.
pub fn is_complete(
    persistence: &mut Persistence,
    preparation_id: i64,
    source_class_ids: &[i64],
) -> Result<bool, ApiError> {
    load_preparation(persistence, preparation_id)?;
    let mappings = persistence.list_mappings(preparation_id)?;
    Ok(rollover::is_complete(source_class_ids, &mappings))
}

/// Reports which active source classes are mapped.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the preparation does not exist.
pub fn mapping_progress(
    persistence: &mut Persistence,
    preparation_id: i64,
) -> Result<MappingProgressResponse, ApiError> {
    load_preparation(persistence, preparation_id)?;
    let progress = persistence.mapping_progress(preparation_id)?;
    Ok(MappingProgressResponse::new(preparation_id, progress))
}
