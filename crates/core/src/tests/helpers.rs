// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollover_domain::{ClassMapping, Enrollment, SchoolClass, TransitionType, ValidatedTransition};

pub fn create_test_class(class_id: i64, year_id: i64, name: &str) -> SchoolClass {
    SchoolClass {
        class_id,
        year_id,
        name: name.to_string(),
        is_active: true,
        is_archived: false,
    }
}

pub fn create_test_mapping(mapping_id: i64, source: i64, target: i64) -> ClassMapping {
    ClassMapping {
        mapping_id,
        preparation_id: 1,
        source_class_id: source,
        target_class_id: target,
    }
}

pub fn create_test_enrollment(student_id: i64, class_id: i64) -> Enrollment {
    Enrollment {
        enrollment_id: student_id * 100 + class_id,
        student_id,
        class_id,
        year_id: 1,
        is_active: true,
    }
}

pub fn create_test_transition(
    student_id: i64,
    transition_type: TransitionType,
    target: Option<i64>,
) -> ValidatedTransition {
    ValidatedTransition {
        student_id,
        source_class_id: 10,
        target_class_id: target,
        transition_type,
    }
}
