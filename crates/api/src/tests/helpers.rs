// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use rollover_domain::DraftTransition;
use rollover_persistence::Persistence;

use crate::{
    AdvanceStatusRequest, ClassInfo, CreateEnrollmentRequest, CreateMappingRequest,
    CreateRosterClassRequest, CreateYearRequest, GetOrCreatePreparationRequest, PreparationInfo,
    SchoolYearInfo, advance_status, create_enrollment, create_mapping, create_roster_class,
    create_year, duplicate_all, get_or_create_preparation,
};

pub const TEST_SCHOOL_ID: i64 = 12;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn year_request(label: &str, start: &str, end: &str) -> CreateYearRequest {
    CreateYearRequest {
        school_id: TEST_SCHOOL_ID,
        label: label.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
        is_current: false,
        is_next: false,
    }
}

pub fn roster_class(name: &str) -> CreateRosterClassRequest {
    CreateRosterClassRequest {
        name: name.to_string(),
        is_active: true,
        is_archived: false,
    }
}

/// The 2023-2024 source year with classes 6A and 6B.
pub struct Roster {
    pub source: SchoolYearInfo,
    pub class_6a: ClassInfo,
    pub class_6b: ClassInfo,
}

pub fn seed_roster(persistence: &mut Persistence) -> Roster {
    let mut request = year_request("2023-2024", "2023-09-01", "2024-07-15");
    request.is_current = true;
    let source = create_year(persistence, &request).expect("Failed to create source year");
    let class_6a = create_roster_class(persistence, source.year_id, &roster_class("6A"))
        .expect("Failed to create 6A");
    let class_6b = create_roster_class(persistence, source.year_id, &roster_class("6B"))
        .expect("Failed to create 6B");
    Roster {
        source,
        class_6a,
        class_6b,
    }
}

pub fn enroll(persistence: &mut Persistence, class_id: i64, students: impl IntoIterator<Item = i64>) {
    for student_id in students {
        create_enrollment(persistence, class_id, &CreateEnrollmentRequest { student_id })
            .expect("Failed to enroll student");
    }
}

pub fn open_preparation(persistence: &mut Persistence, roster: &Roster) -> PreparationInfo {
    get_or_create_preparation(
        persistence,
        &GetOrCreatePreparationRequest {
            school_id: TEST_SCHOOL_ID,
            source_year_id: roster.source.year_id,
            target_year_id: None,
        },
    )
    .expect("Failed to open preparation")
    .preparation
}

pub fn advance(
    persistence: &mut Persistence,
    preparation_id: i64,
    expected: &str,
    next: &str,
) -> PreparationInfo {
    advance_status(
        persistence,
        preparation_id,
        &AdvanceStatusRequest {
            expected_status: expected.to_string(),
            next_status: next.to_string(),
        },
    )
    .expect("Failed to advance preparation")
}

/// Target classes 6A and 6B after duplication and mapping.
pub struct Mapped {
    pub preparation: PreparationInfo,
    pub target_6a: ClassInfo,
    pub target_6b: ClassInfo,
}

/// Opens a preparation and walks it to `mapping_done`.
pub fn prepare_mapping_done(persistence: &mut Persistence, roster: &Roster) -> Mapped {
    let preparation = open_preparation(persistence, roster);
    let id = preparation.preparation_id;

    let created = duplicate_all(persistence, id).expect("Failed to duplicate classes");
    let target_6a = created.iter().find(|c| c.name == "6A").unwrap().clone();
    let target_6b = created.iter().find(|c| c.name == "6B").unwrap().clone();

    for (source, target) in [
        (roster.class_6a.class_id, target_6a.class_id),
        (roster.class_6b.class_id, target_6b.class_id),
    ] {
        create_mapping(
            persistence,
            id,
            &CreateMappingRequest {
                source_class_id: source,
                target_class_id: target,
            },
        )
        .expect("Failed to create mapping");
    }

    advance(persistence, id, "initialized", "classes_created");
    let preparation = advance(persistence, id, "classes_created", "mapping_done");

    Mapped {
        preparation,
        target_6a,
        target_6b,
    }
}

pub fn draft(
    student_id: i64,
    source_class_id: i64,
    target_class_id: Option<i64>,
    transition_type: &str,
) -> DraftTransition {
    DraftTransition {
        student_id,
        source_class_id,
        target_class_id,
        transition_type: transition_type.to_string(),
    }
}
