// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, CreateClassRequest, CreateRosterClassRequest, create_roster_class, create_single,
    duplicate_all, list_target_classes,
};

use super::helpers::{create_test_persistence, open_preparation, prepare_mapping_done, seed_roster};

#[test]
fn test_duplicate_all_copies_active_classes_once() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    create_roster_class(
        &mut persistence,
        roster.source.year_id,
        &CreateRosterClassRequest {
            name: String::from("5C"),
            is_active: true,
            is_archived: true,
        },
    )
    .unwrap();
    create_roster_class(
        &mut persistence,
        roster.source.year_id,
        &CreateRosterClassRequest {
            name: String::from("Choir"),
            is_active: false,
            is_archived: false,
        },
    )
    .unwrap();
    let preparation = open_preparation(&mut persistence, &roster);
    let id = preparation.preparation_id;

    let created = duplicate_all(&mut persistence, id).unwrap();
    let mut names: Vec<&str> = created.iter().map(|c| c.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["6A", "6B"]);
    assert!(
        created
            .iter()
            .all(|c| c.year_id == preparation.target_year_id && c.is_active && !c.is_archived)
    );

    let again = duplicate_all(&mut persistence, id).unwrap();
    assert!(again.is_empty());
    assert_eq!(list_target_classes(&mut persistence, id).unwrap().len(), 2);
}

#[test]
fn test_duplicate_all_skips_names_created_by_hand() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let id = open_preparation(&mut persistence, &roster).preparation_id;
    create_single(
        &mut persistence,
        id,
        &CreateClassRequest {
            name: String::from(" 6A "),
        },
    )
    .unwrap();

    let created = duplicate_all(&mut persistence, id).unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "6B");
}

#[test]
fn test_create_single_trims_and_allows_duplicate_names() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let id = open_preparation(&mut persistence, &roster).preparation_id;
    let request = CreateClassRequest {
        name: String::from("  7B  "),
    };

    let first = create_single(&mut persistence, id, &request).unwrap();
    let second = create_single(&mut persistence, id, &request).unwrap();

    assert_eq!(first.name, "7B");
    assert_ne!(first.class_id, second.class_id);
}

#[test]
fn test_create_single_rejects_blank_name() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let id = open_preparation(&mut persistence, &roster).preparation_id;

    let result = create_single(
        &mut persistence,
        id,
        &CreateClassRequest {
            name: String::from("   "),
        },
    );

    match result {
        Err(ApiError::ValidationError { violations }) => {
            assert_eq!(violations[0].field, "name");
        }
        other => panic!("Expected ValidationError, got: {other:?}"),
    }
}

#[test]
fn test_class_changes_closed_after_mapping_done() {
    let mut persistence = create_test_persistence();
    let roster = seed_roster(&mut persistence);
    let mapped = prepare_mapping_done(&mut persistence, &roster);
    let id = mapped.preparation.preparation_id;

    let single = create_single(
        &mut persistence,
        id,
        &CreateClassRequest {
            name: String::from("7C"),
        },
    );
    assert!(matches!(single, Err(ApiError::StateConflict { .. })));

    let duplicate = duplicate_all(&mut persistence, id);
    assert!(matches!(duplicate, Err(ApiError::StateConflict { .. })));
}

#[test]
fn test_provisioning_unknown_preparation_not_found() {
    let mut persistence = create_test_persistence();

    assert!(matches!(
        duplicate_all(&mut persistence, 5),
        Err(ApiError::NotFound { .. })
    ));
    assert!(matches!(
        list_target_classes(&mut persistence, 5),
        Err(ApiError::NotFound { .. })
    ));
}
