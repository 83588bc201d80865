// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The API boundary of the year-transition workflow.
//!
//! Every operation takes the persistence handle and a request DTO, and
//! returns a response DTO or an [`ApiError`]. Domain and persistence errors
//! never cross this boundary untranslated.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod mapping;
mod promotion;
mod provisioner;
mod request_response;
mod roster;
mod workflow;

#[cfg(test)]
mod tests;

pub use error::{ApiError, FieldViolation, translate_domain_error, translate_persistence_error};
pub use mapping::{create_mapping, delete_mapping, is_complete, list_mappings, mapping_progress};
pub use promotion::{default_drafts, list_transitions, promote};
pub use provisioner::{create_single, duplicate_all, list_target_classes};
pub use request_response::{
    AdvanceStatusRequest, ClassInfo, ClassMappingInfo, CreateClassRequest,
    CreateEnrollmentRequest, CreateMappingRequest, CreateRosterClassRequest, CreateYearRequest,
    EnrollmentInfo, GetOrCreatePreparationRequest, GetOrCreatePreparationResponse,
    MappingProgressResponse, PreparationInfo, PromoteRequest, PromoteResponse, SchoolYearInfo,
    StudentTransitionInfo,
};
pub use roster::{
    create_enrollment, create_roster_class, create_year, list_class_enrollments,
    list_year_classes, list_years,
};
pub use workflow::{advance_status, get_or_create_preparation, get_preparation};
