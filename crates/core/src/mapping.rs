// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{BTreeSet, HashMap, HashSet};

use rollover_domain::{ClassMapping, DraftTransition, Enrollment};

/// How far the mapping of a preparation has progressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingProgress {
    /// Distinct source classes that need a mapping, ascending.
    pub source_class_ids: Vec<i64>,
    /// Source classes with exactly one mapping row.
    pub mapped_class_ids: Vec<i64>,
    /// Source classes with no usable mapping.
    pub unmapped_class_ids: Vec<i64>,
}

impl MappingProgress {
    /// Returns true if every source class is mapped exactly once.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unmapped_class_ids.is_empty()
    }
}

/// Computes mapping progress for a set of source classes.
///
/// A source class counts as mapped only if it has exactly one mapping row.
#[must_use]
pub fn mapping_progress(source_class_ids: &[i64], mappings: &[ClassMapping]) -> MappingProgress {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for mapping in mappings {
        *counts.entry(mapping.source_class_id).or_default() += 1;
    }

    let distinct: BTreeSet<i64> = source_class_ids.iter().copied().collect();
    let (mapped, unmapped): (Vec<i64>, Vec<i64>) = distinct
        .iter()
        .copied()
        .partition(|id| counts.get(id) == Some(&1));

    MappingProgress {
        source_class_ids: distinct.into_iter().collect(),
        mapped_class_ids: mapped,
        unmapped_class_ids: unmapped,
    }
}

/// Returns true iff every id in `source_class_ids` has exactly one mapping row.
#[must_use]
pub fn is_complete(source_class_ids: &[i64], mappings: &[ClassMapping]) -> bool {
    mapping_progress(source_class_ids, mappings).is_complete()
}

/// Builds the default transition drafts from the class mappings.
///
/// Every active enrollment in a mapped source class becomes a `promoted`
/// draft towards the mapped target class. Enrollments in unmapped classes
/// are left out, and a student enrolled in several mapped classes is
/// drafted once, for the first mapping in `mappings` order.
#[must_use]
pub fn default_drafts(mappings: &[ClassMapping], enrollments: &[Enrollment]) -> Vec<DraftTransition> {
    let mut by_class: HashMap<i64, Vec<&Enrollment>> = HashMap::new();
    for enrollment in enrollments.iter().filter(|e| e.is_active) {
        by_class.entry(enrollment.class_id).or_default().push(enrollment);
    }

    let mut drafted: HashSet<i64> = HashSet::new();
    let mut drafts: Vec<DraftTransition> = Vec::new();

    for mapping in mappings {
        let Some(class_enrollments) = by_class.get(&mapping.source_class_id) else {
            continue;
        };
        for enrollment in class_enrollments {
            if drafted.insert(enrollment.student_id) {
                drafts.push(DraftTransition::promoted(
                    enrollment.student_id,
                    mapping.source_class_id,
                    mapping.target_class_id,
                ));
            }
        }
    }

    drafts
}
