// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollover_domain::PreparationStatus;

use crate::{
    AdvanceStatusRequest, ApiError, CreateClassRequest, GetOrCreatePreparationRequest,
    advance_status, create_single, create_year, get_or_create_preparation, get_preparation,
    list_years,
};

use super::helpers::{
    TEST_SCHOOL_ID, advance, create_test_persistence, open_preparation, seed_roster, year_request,
};

fn advance_request(expected: &str, next: &str) -> AdvanceStatusRequest {
    AdvanceStatusRequest {
        expected_status: expected.to_string(),
        next_status: next.to_string(),
    }
}

#[test]
fn test_get_or_create_auto_creates_successor_year() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);

    let response = get_or_create_preparation(
        &mut persistence,
        &GetOrCreatePreparationRequest {
            school_id: TEST_SCHOOL_ID,
            source_year_id: roster.source.year_id,
            target_year_id: None,
        },
    )
    .unwrap();

    assert!(response.created);
    assert_eq!(response.preparation.status, PreparationStatus::Initialized);
    assert_eq!(response.preparation.source_year_id, roster.source.year_id);
    assert!(response.preparation.classes_created_at.is_none());

    let years = list_years(&mut persistence, TEST_SCHOOL_ID).unwrap();
    assert_eq!(years.len(), 2);
    let target = years
        .iter()
        .find(|y| y.year_id == response.preparation.target_year_id)
        .unwrap();
    assert_eq!(target.label, "2024-2025");
    assert_eq!(target.start_date, "2024-09-01");
    assert!(target.is_next);
}

#[test]
fn test_get_or_create_returns_the_open_preparation() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let request = GetOrCreatePreparationRequest {
        school_id: TEST_SCHOOL_ID,
        source_year_id: roster.source.year_id,
        target_year_id: None,
    };

    let first = get_or_create_preparation(&mut persistence, &request).unwrap();
    let second = get_or_create_preparation(&mut persistence, &request).unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(
        first.preparation.preparation_id,
        second.preparation.preparation_id
    );
    assert_eq!(list_years(&mut persistence, TEST_SCHOOL_ID).unwrap().len(), 2);
}

#[test]
fn test_get_or_create_uses_existing_next_year() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let mut next = year_request("2024/25", "2024-08-26", "2025-07-11");
    next.is_next = true;
    let next = create_year(&mut persistence, &next).unwrap();

    let preparation = open_preparation(&mut persistence, &roster);

    assert_eq!(preparation.target_year_id, next.year_id);
    assert_eq!(list_years(&mut persistence, TEST_SCHOOL_ID).unwrap().len(), 2);
}

#[test]
fn test_get_or_create_accepts_explicit_target_year() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let target = create_year(
        &mut persistence,
        &year_request("2025-2026", "2025-09-01", "2026-07-15"),
    )
    .unwrap();

    let response = get_or_create_preparation(
        &mut persistence,
        &GetOrCreatePreparationRequest {
            school_id: TEST_SCHOOL_ID,
            source_year_id: roster.source.year_id,
            target_year_id: Some(target.year_id),
        },
    )
    .unwrap();

    assert_eq!(response.preparation.target_year_id, target.year_id);
}

#[test]
fn test_get_or_create_rejects_target_year_before_source() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let earlier = create_year(
        &mut persistence,
        &year_request("2022-2023", "2022-09-01", "2023-07-15"),
    )
    .unwrap();

    let result = get_or_create_preparation(
        &mut persistence,
        &GetOrCreatePreparationRequest {
            school_id: TEST_SCHOOL_ID,
            source_year_id: roster.source.year_id,
            target_year_id: Some(earlier.year_id),
        },
    );

    match result {
        Err(ApiError::ValidationError { violations }) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "target_year_id");
        }
        other => panic!("Expected ValidationError, got: {other:?}"),
    }
}

#[test]
fn test_get_or_create_rejects_unknown_target_year() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);

    let result = get_or_create_preparation(
        &mut persistence,
        &GetOrCreatePreparationRequest {
            school_id: TEST_SCHOOL_ID,
            source_year_id: roster.source.year_id,
            target_year_id: Some(9999),
        },
    );

    assert!(matches!(result, Err(ApiError::ValidationError { .. })));
}

#[test]
fn test_get_or_create_rejects_year_of_another_school() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);

    let result = get_or_create_preparation(
        &mut persistence,
        &GetOrCreatePreparationRequest {
            school_id: TEST_SCHOOL_ID + 1,
            source_year_id: roster.source.year_id,
            target_year_id: None,
        },
    );

    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[test]
fn test_get_or_create_rejects_unknown_source_year() {
    let mut persistence = create_test_persistence();

    let result = get_or_create_preparation(
        &mut persistence,
        &GetOrCreatePreparationRequest {
            school_id: TEST_SCHOOL_ID,
            source_year_id: 404,
            target_year_id: None,
        },
    );

    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[test]
fn test_get_preparation_not_found() {
    let mut persistence = create_test_persistence();

    let err = get_preparation(&mut persistence, 77).unwrap_err();

    assert_eq!(err.kind(), "not_found");
}

#[test]
fn test_advance_requires_a_target_class() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let preparation = open_preparation(&mut persistence, &roster);

    let result = advance_status(
        &mut persistence,
        preparation.preparation_id,
        &advance_request("initialized", "classes_created"),
    );

    match result {
        Err(ApiError::ValidationError { violations }) => {
            assert_eq!(violations[0].field, "target_classes");
        }
        other => panic!("Expected ValidationError, got: {other:?}"),
    }
}

#[test]
fn test_advance_with_stale_expected_status_conflicts() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let preparation = open_preparation(&mut persistence, &roster);
    let id = preparation.preparation_id;
    create_single(
        &mut persistence,
        id,
        &CreateClassRequest {
            name: String::from("7A"),
        },
    )
    .unwrap();
    advance(&mut persistence, id, "initialized", "classes_created");

    let result = advance_status(
        &mut persistence,
        id,
        &advance_request("initialized", "classes_created"),
    );

    match result {
        Err(ApiError::StateConflict {
            expected, actual, ..
        }) => {
            assert_eq!(expected.as_deref(), Some("initialized"));
            assert_eq!(actual.as_deref(), Some("classes_created"));
        }
        other => panic!("Expected StateConflict, got: {other:?}"),
    }
}

#[test]
fn test_advance_cannot_skip_or_go_back() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let id = open_preparation(&mut persistence, &roster).preparation_id;

    let skip = advance_status(
        &mut persistence,
        id,
        &advance_request("initialized", "mapping_done"),
    );
    assert!(matches!(skip, Err(ApiError::StateConflict { .. })));

    let back = advance_status(
        &mut persistence,
        id,
        &advance_request("initialized", "initialized"),
    );
    assert!(matches!(back, Err(ApiError::StateConflict { .. })));

    let status = get_preparation(&mut persistence, id).unwrap().status;
    assert_eq!(status, PreparationStatus::Initialized);
}

#[test]
fn test_advance_rejects_unknown_status_strings() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let id = open_preparation(&mut persistence, &roster).preparation_id;

    let result = advance_status(&mut persistence, id, &advance_request("initialized", "done"));

    match result {
        Err(ApiError::ValidationError { violations }) => {
            assert_eq!(violations[0].field, "next_status");
        }
        other => panic!("Expected ValidationError, got: {other:?}"),
    }
}

#[test]
fn test_advance_to_completed_is_reserved_for_promotion() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let mapped = super::helpers::prepare_mapping_done(&mut persistence, &roster);

    let result = advance_status(
        &mut persistence,
        mapped.preparation.preparation_id,
        &advance_request("mapping_done", "completed"),
    );

    assert!(matches!(result, Err(ApiError::StateConflict { .. })));
    assert!(mapped.preparation.mapping_done_at.is_some());
}
