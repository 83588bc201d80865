// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use rollover_domain::{PreparationStatus, SchoolClass, TransitionType, ValidatedTransition};

use super::{
    Seeded, departed, enroll_students, prepare_for_promotion, promoted, seed_preparation,
};
use crate::{Persistence, PersistenceError, RosterSource};

/// 28 promoted, 1 retained and 1 departed student out of 6A's 30.
fn class_6a_batch(
    students: &[i64],
    source: &SchoolClass,
    target: &SchoolClass,
) -> Vec<ValidatedTransition> {
    students
        .iter()
        .map(|&student_id| match student_id {
            29 => ValidatedTransition {
                transition_type: TransitionType::Retained,
                ..promoted(student_id, source, target)
            },
            30 => departed(student_id, source),
            _ => promoted(student_id, source, target),
        })
        .collect()
}

struct Scenario {
    seeded: Seeded,
    target_6a: SchoolClass,
    target_6b: SchoolClass,
    students_6a: Vec<i64>,
    students_6b: Vec<i64>,
}

fn scenario(persistence: &mut Persistence) -> Scenario {
    let seeded = seed_preparation(persistence);
    let students_6a = enroll_students(persistence, &seeded.class_6a, 1, 30);
    let students_6b = enroll_students(persistence, &seeded.class_6b, 101, 10);
    let (target_6a, target_6b) = prepare_for_promotion(persistence, &seeded);
    Scenario {
        seeded,
        target_6a,
        target_6b,
        students_6a,
        students_6b,
    }
}

fn full_batch(s: &Scenario) -> Vec<ValidatedTransition> {
    let mut batch = class_6a_batch(&s.students_6a, &s.seeded.class_6a, &s.target_6a);
    batch.extend(
        s.students_6b
            .iter()
            .map(|&id| promoted(id, &s.seeded.class_6b, &s.target_6b)),
    );
    batch
}

fn enrollments_in(persistence: &mut Persistence, class: &SchoolClass) -> usize {
    persistence
        .list_enrollments(class.class_id, class.year_id)
        .unwrap()
        .len()
}

#[test]
fn test_full_batch_promotes_and_completes() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let s = scenario(&mut persistence);
    let id = s.seeded.preparation.preparation_id;

    let outcome = persistence.apply_promotion(id, full_batch(&s)).unwrap();

    assert_eq!(outcome.applied, 40);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.enrollments_created, 39);
    assert!(outcome.outstanding_students.is_empty());
    assert_eq!(outcome.preparation.status, PreparationStatus::Completed);
    assert!(outcome.preparation.completed_at.is_some());

    assert_eq!(enrollments_in(&mut persistence, &s.target_6a), 29);
    assert_eq!(enrollments_in(&mut persistence, &s.target_6b), 10);

    let audit = persistence.list_transitions(id).unwrap();
    let from_6a = audit
        .iter()
        .filter(|t| t.source_class_id == s.seeded.class_6a.class_id)
        .count();
    assert_eq!(from_6a, 30);
}

#[test]
fn test_departed_student_gets_no_enrollment() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let s = scenario(&mut persistence);
    let id = s.seeded.preparation.preparation_id;

    persistence.apply_promotion(id, full_batch(&s)).unwrap();

    let audit = persistence.list_transitions(id).unwrap();
    let leaver = audit.iter().find(|t| t.student_id == 30).unwrap();
    assert_eq!(leaver.transition_type, TransitionType::Departed);
    assert_eq!(leaver.target_class_id, None);
    assert_eq!(leaver.enrollment_id, None);

    let retained = audit.iter().find(|t| t.student_id == 29).unwrap();
    assert_eq!(retained.transition_type, TransitionType::Retained);
    assert!(retained.enrollment_id.is_some());

    let target_students: Vec<i64> = persistence
        .list_enrollments(s.target_6a.class_id, s.target_6a.year_id)
        .unwrap()
        .into_iter()
        .map(|e| e.student_id)
        .collect();
    assert!(!target_students.contains(&30));
}

#[test]
fn test_identical_batch_twice_yields_one_row_per_student() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let s = scenario(&mut persistence);
    let id = s.seeded.preparation.preparation_id;

    persistence.apply_promotion(id, full_batch(&s)).unwrap();
    let second = persistence.apply_promotion(id, full_batch(&s)).unwrap();

    assert_eq!(second.applied, 0);
    assert_eq!(second.skipped, 40);
    assert_eq!(second.enrollments_created, 0);
    assert_eq!(second.preparation.status, PreparationStatus::Completed);
    assert_eq!(persistence.list_transitions(id).unwrap().len(), 40);
    assert_eq!(
        persistence
            .count_year_enrollments(s.seeded.target.year_id)
            .unwrap(),
        39
    );
}

#[test]
fn test_partial_batch_then_superset_converges() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let s = scenario(&mut persistence);
    let id = s.seeded.preparation.preparation_id;

    let first_half: Vec<ValidatedTransition> =
        class_6a_batch(&s.students_6a[..15], &s.seeded.class_6a, &s.target_6a);
    let partial = persistence.apply_promotion(id, first_half).unwrap();

    assert_eq!(partial.applied, 15);
    assert_eq!(partial.preparation.status, PreparationStatus::MappingDone);
    assert_eq!(partial.outstanding_students.len(), 25);
    assert_eq!(partial.outstanding_students[0], 16);

    let rest = persistence.apply_promotion(id, full_batch(&s)).unwrap();

    assert_eq!(rest.applied, 25);
    assert_eq!(rest.skipped, 15);
    assert_eq!(rest.preparation.status, PreparationStatus::Completed);
    assert_eq!(enrollments_in(&mut persistence, &s.target_6a), 29);
}

#[test]
fn test_failed_write_rolls_back_whole_batch() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let s = scenario(&mut persistence);
    let id = s.seeded.preparation.preparation_id;

    let missing_class = SchoolClass {
        class_id: 987_654,
        ..s.target_6a.clone()
    };
    let batch = vec![
        promoted(1, &s.seeded.class_6a, &s.target_6a),
        promoted(2, &s.seeded.class_6a, &missing_class),
    ];

    let result = persistence.apply_promotion(id, batch);

    assert!(matches!(
        result,
        Err(PersistenceError::ApplyRolledBack { preparation_id, .. }) if preparation_id == id
    ));
    assert!(persistence.list_transitions(id).unwrap().is_empty());
    assert_eq!(
        persistence
            .count_year_enrollments(s.seeded.target.year_id)
            .unwrap(),
        0
    );
    assert_eq!(
        persistence.get_preparation(id).unwrap().status,
        PreparationStatus::MappingDone
    );

    let retried = persistence.apply_promotion(id, full_batch(&s)).unwrap();
    assert_eq!(retried.applied, 40);
}

#[test]
fn test_departed_with_target_violates_check_constraint() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let s = scenario(&mut persistence);
    let id = s.seeded.preparation.preparation_id;
    let bad = ValidatedTransition {
        transition_type: TransitionType::Departed,
        ..promoted(1, &s.seeded.class_6a, &s.target_6a)
    };

    let result = persistence.apply_promotion(id, vec![bad]);

    assert!(matches!(
        result,
        Err(PersistenceError::ApplyRolledBack { .. })
    ));
    assert!(persistence.list_transitions(id).unwrap().is_empty());
}

#[test]
fn test_apply_before_mapping_done_reports_unmapped_classes() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed_preparation(&mut persistence);
    let id = seeded.preparation.preparation_id;
    let target = persistence.create_target_class(id, "7A").unwrap();
    persistence
        .create_mapping(id, seeded.class_6a.class_id, target.class_id)
        .unwrap();

    let result = persistence.apply_promotion(id, vec![promoted(1, &seeded.class_6a, &target)]);

    assert_eq!(
        result,
        Err(PersistenceError::IncompleteMapping {
            preparation_id: id,
            unmapped_class_ids: vec![seeded.class_6b.class_id],
        })
    );
}

#[test]
fn test_apply_with_complete_mapping_but_stale_status_is_a_conflict() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed_preparation(&mut persistence);
    let id = seeded.preparation.preparation_id;
    let target = persistence.create_target_class(id, "7").unwrap();
    persistence
        .create_mapping(id, seeded.class_6a.class_id, target.class_id)
        .unwrap();
    persistence
        .create_mapping(id, seeded.class_6b.class_id, target.class_id)
        .unwrap();

    let result = persistence.apply_promotion(id, vec![promoted(1, &seeded.class_6a, &target)]);

    assert_eq!(
        result,
        Err(PersistenceError::StateConflict {
            preparation_id: id,
            expected: PreparationStatus::MappingDone,
            actual: PreparationStatus::Initialized,
        })
    );
}

#[test]
fn test_new_student_after_completion_is_a_conflict() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let s = scenario(&mut persistence);
    let id = s.seeded.preparation.preparation_id;
    persistence.apply_promotion(id, full_batch(&s)).unwrap();

    let result = persistence.apply_promotion(
        id,
        vec![promoted(500, &s.seeded.class_6a, &s.target_6a)],
    );

    assert!(matches!(
        result,
        Err(PersistenceError::StateConflict {
            actual: PreparationStatus::Completed,
            ..
        })
    ));
}

#[test]
fn test_inactive_enrollments_are_not_outstanding() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let seeded = seed_preparation(&mut persistence);
    let id = seeded.preparation.preparation_id;
    enroll_students(&mut persistence, &seeded.class_6a, 1, 2);
    let (target_6a, _) = prepare_for_promotion(&mut persistence, &seeded);

    diesel::update(crate::diesel_schema::enrollments::table)
        .filter(crate::diesel_schema::enrollments::student_id.eq(2))
        .set(crate::diesel_schema::enrollments::is_active.eq(0))
        .execute(&mut persistence.conn)
        .unwrap();

    let outcome = persistence
        .apply_promotion(id, vec![promoted(1, &seeded.class_6a, &target_6a)])
        .unwrap();

    assert_eq!(outcome.preparation.status, PreparationStatus::Completed);
}

#[test]
fn test_concurrent_identical_batches_record_each_student_once() {
    let path = std::env::temp_dir().join(format!(
        "rollover_concurrent_apply_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let (id, batch) = {
        let mut setup = Persistence::new_with_file(&path).unwrap();
        let s = scenario(&mut setup);
        (s.seeded.preparation.preparation_id, full_batch(&s))
    };

    let mut handles: Vec<Persistence> = (0..4)
        .map(|_| Persistence::new_with_file(&path).unwrap())
        .collect();

    let mut outcomes: Vec<(usize, PreparationStatus)> = std::thread::scope(|scope| {
        let workers: Vec<_> = handles
            .iter_mut()
            .map(|persistence| {
                let batch = batch.clone();
                scope.spawn(move || {
                    let outcome = persistence.apply_promotion(id, batch).unwrap();
                    (outcome.applied, outcome.preparation.status)
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });
    outcomes.sort_unstable_by_key(|&(applied, _)| applied);

    assert_eq!(
        outcomes,
        vec![
            (0, PreparationStatus::Completed),
            (0, PreparationStatus::Completed),
            (0, PreparationStatus::Completed),
            (40, PreparationStatus::Completed),
        ]
    );
    assert_eq!(handles[0].list_transitions(id).unwrap().len(), 40);

    drop(handles);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
