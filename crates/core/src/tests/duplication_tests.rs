// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::plan_duplication;
use crate::tests::helpers::create_test_class;

#[test]
fn test_duplicates_every_active_class() {
    let source = vec![create_test_class(1, 1, "6A"), create_test_class(2, 1, "6B")];

    assert_eq!(plan_duplication(&source, &[]), vec!["6A", "6B"]);
}

#[test]
fn test_rerun_creates_nothing() {
    let source = vec![create_test_class(1, 1, "6A"), create_test_class(2, 1, "6B")];
    let existing = vec![String::from("6A"), String::from("6B")];

    assert!(plan_duplication(&source, &existing).is_empty());
}

#[test]
fn test_partial_target_only_fills_gaps() {
    let source = vec![create_test_class(1, 1, "6A"), create_test_class(2, 1, "6B")];
    let existing = vec![String::from(" 6A ")];

    assert_eq!(plan_duplication(&source, &existing), vec!["6B"]);
}

#[test]
fn test_inactive_and_archived_classes_skipped() {
    let mut inactive = create_test_class(2, 1, "6B");
    inactive.is_active = false;
    let mut archived = create_test_class(3, 1, "6C");
    archived.is_archived = true;
    let source = vec![create_test_class(1, 1, "6A"), inactive, archived];

    assert_eq!(plan_duplication(&source, &[]), vec!["6A"]);
}

#[test]
fn test_shared_source_names_collapse() {
    let source = vec![create_test_class(1, 1, "6A"), create_test_class(2, 1, "6A")];

    assert_eq!(plan_duplication(&source, &[]), vec!["6A"]);
}
