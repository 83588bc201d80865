// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Promotion planning.
//!
//! Retries are made safe here: a student who already has an audit row for
//! the preparation is never planned again, whatever the resubmitted batch
//! says about them.

use std::collections::{BTreeSet, HashSet};

use rollover_domain::ValidatedTransition;

/// The writes a promotion batch will perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionPlan {
    /// The year new enrollments are created in.
    pub target_year_id: i64,
    /// Transitions to record, in submission order.
    pub to_apply: Vec<ValidatedTransition>,
    /// Students skipped because an earlier apply already recorded them.
    pub already_recorded: Vec<i64>,
}

impl PromotionPlan {
    /// Number of enrollments the plan creates (every non-departed entry).
    #[must_use]
    pub fn enrollment_count(&self) -> usize {
        self.to_apply
            .iter()
            .filter(|t| t.transition_type.requires_target_class())
            .count()
    }

    /// Returns true if the plan performs no writes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_apply.is_empty()
    }
}

/// Splits a validated batch into the part still to apply and the part
/// already recorded.
///
/// # Arguments
///
/// * `target_year_id` - The preparation's target year
/// * `transitions` - A validated batch (student ids unique)
/// * `recorded_students` - Students with an audit row for this preparation
#[must_use]
pub fn plan_promotion(
    target_year_id: i64,
    transitions: Vec<ValidatedTransition>,
    recorded_students: &HashSet<i64>,
) -> PromotionPlan {
    let (already, to_apply): (Vec<ValidatedTransition>, Vec<ValidatedTransition>) = transitions
        .into_iter()
        .partition(|t| recorded_students.contains(&t.student_id));

    PromotionPlan {
        target_year_id,
        to_apply,
        already_recorded: already.into_iter().map(|t| t.student_id).collect(),
    }
}

/// Returns the enrolled students that have no audit row yet, ascending.
///
/// A preparation is finished once this is empty.
#[must_use]
pub fn outstanding_students(
    enrolled_students: &[i64],
    recorded_students: &HashSet<i64>,
) -> Vec<i64> {
    enrolled_students
        .iter()
        .copied()
        .filter(|id| !recorded_students.contains(id))
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect()
}
