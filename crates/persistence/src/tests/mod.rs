// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod initialization_tests;
mod promotion_tests;

use rollover_domain::{
    NewSchoolYear, Preparation, SchoolClass, SchoolYear, TransitionType, ValidatedTransition,
};
use time::{Date, Month};

use crate::{Persistence, RosterSource, SchoolYearRegistry};

pub const TEST_SCHOOL_ID: i64 = 7;

pub fn create_test_date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("Valid test date")
}

/// Creates the school's `2023-2024` year, flagged current.
pub fn create_source_year(persistence: &mut Persistence) -> SchoolYear {
    let year = NewSchoolYear::new(
        TEST_SCHOOL_ID,
        "2023-2024",
        create_test_date(2023, Month::September, 1),
        create_test_date(2024, Month::June, 30),
    )
    .expect("Valid year")
    .current();
    persistence.create_year(&year).expect("Year created")
}

/// Creates the school's `2024-2025` year.
pub fn create_target_year(persistence: &mut Persistence) -> SchoolYear {
    let year = NewSchoolYear::new(
        TEST_SCHOOL_ID,
        "2024-2025",
        create_test_date(2024, Month::September, 1),
        create_test_date(2025, Month::June, 30),
    )
    .expect("Valid year");
    persistence.create_year(&year).expect("Year created")
}

/// A preparation between two years, with classes 6A and 6B in the source year.
pub struct Seeded {
    pub source: SchoolYear,
    pub target: SchoolYear,
    pub preparation: Preparation,
    pub class_6a: SchoolClass,
    pub class_6b: SchoolClass,
}

pub fn seed_preparation(persistence: &mut Persistence) -> Seeded {
    let source = create_source_year(persistence);
    let target = create_target_year(persistence);
    let class_6a = persistence
        .create_class(source.year_id, "6A", true, false)
        .unwrap();
    let class_6b = persistence
        .create_class(source.year_id, "6B", true, false)
        .unwrap();
    let (preparation, created) = persistence
        .get_or_create_preparation(TEST_SCHOOL_ID, source.year_id, target.year_id)
        .unwrap();
    assert!(created);

    Seeded {
        source,
        target,
        preparation,
        class_6a,
        class_6b,
    }
}

/// Enrolls students `first..first + count` in a class of its year.
pub fn enroll_students(
    persistence: &mut Persistence,
    class: &SchoolClass,
    first: i64,
    count: i64,
) -> Vec<i64> {
    (first..first + count)
        .map(|student_id| {
            persistence
                .create_enrollment(student_id, class.class_id, class.year_id)
                .unwrap();
            student_id
        })
        .collect()
}

/// Duplicates classes, maps 6A and 6B by name and moves to `mapping_done`.
///
/// Returns the target classes for 6A and 6B.
pub fn prepare_for_promotion(
    persistence: &mut Persistence,
    seeded: &Seeded,
) -> (SchoolClass, SchoolClass) {
    let id = seeded.preparation.preparation_id;
    let created = persistence.duplicate_classes(id).unwrap();
    let target_6a = created.iter().find(|c| c.name == "6A").unwrap().clone();
    let target_6b = created.iter().find(|c| c.name == "6B").unwrap().clone();

    persistence
        .create_mapping(id, seeded.class_6a.class_id, target_6a.class_id)
        .unwrap();
    persistence
        .create_mapping(id, seeded.class_6b.class_id, target_6b.class_id)
        .unwrap();

    persistence
        .advance_preparation(
            id,
            rollover_domain::PreparationStatus::Initialized,
            rollover_domain::PreparationStatus::ClassesCreated,
        )
        .unwrap();
    persistence
        .advance_preparation(
            id,
            rollover_domain::PreparationStatus::ClassesCreated,
            rollover_domain::PreparationStatus::MappingDone,
        )
        .unwrap();

    (target_6a, target_6b)
}

pub fn promoted(student_id: i64, source: &SchoolClass, target: &SchoolClass) -> ValidatedTransition {
    ValidatedTransition {
        student_id,
        source_class_id: source.class_id,
        target_class_id: Some(target.class_id),
        transition_type: TransitionType::Promoted,
    }
}

pub fn departed(student_id: i64, source: &SchoolClass) -> ValidatedTransition {
    ValidatedTransition {
        student_id,
        source_class_id: source.class_id,
        target_class_id: None,
        transition_type: TransitionType::Departed,
    }
}
