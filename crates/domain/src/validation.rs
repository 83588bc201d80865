// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use crate::error::{DomainError, TransitionViolation};
use crate::school_year::SchoolYear;
use crate::transition::{DraftTransition, TransitionType, ValidatedTransition};

/// Validates a class name and returns it trimmed.
///
/// # Errors
///
/// Returns `DomainError::InvalidClassName` if the name is blank.
pub fn validate_class_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidClassName(String::from(
            "name cannot be empty",
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates that `target` can follow `source` in a transition.
///
/// # Errors
///
/// Returns an error if the years belong to different schools or the target
/// year does not start after the source year.
pub fn validate_target_year(source: &SchoolYear, target: &SchoolYear) -> Result<(), DomainError> {
    if target.school_id != source.school_id {
        return Err(DomainError::YearSchoolMismatch {
            year_id: target.year_id,
            school_id: source.school_id,
        });
    }
    if target.start_date <= source.start_date {
        return Err(DomainError::TargetYearNotAfterSource {
            source_year_id: source.year_id,
            target_year_id: target.year_id,
        });
    }
    Ok(())
}

/// Validates a whole transition batch.
///
/// Every entry is checked and every violation is collected; the batch is
/// accepted only if none are found.
///
/// # Arguments
///
/// * `drafts` - The submitted transitions
/// * `source_class_ids` - Active classes of the preparation's source year
/// * `target_class_ids` - Classes of the preparation's target year
///
/// # Errors
///
/// Returns `DomainError::InvalidTransitionBatch` listing all violations.
pub fn validate_transition_batch(
    drafts: &[DraftTransition],
    source_class_ids: &HashSet<i64>,
    target_class_ids: &HashSet<i64>,
) -> Result<Vec<ValidatedTransition>, DomainError> {
    let mut violations: Vec<TransitionViolation> = Vec::new();
    let mut seen_students: HashSet<i64> = HashSet::with_capacity(drafts.len());
    let mut validated: Vec<ValidatedTransition> = Vec::with_capacity(drafts.len());

    for (index, draft) in drafts.iter().enumerate() {
        let mut violation = |field: &str, message: String| {
            violations.push(TransitionViolation {
                index,
                student_id: draft.student_id,
                field: field.to_string(),
                message,
            });
        };

        if draft.student_id <= 0 {
            violation("student_id", String::from("must be a positive identifier"));
        } else if !seen_students.insert(draft.student_id) {
            violation(
                "student_id",
                format!("student {} appears more than once", draft.student_id),
            );
        }

        if !source_class_ids.contains(&draft.source_class_id) {
            violation(
                "source_class_id",
                format!(
                    "class {} is not an active class of the source year",
                    draft.source_class_id
                ),
            );
        }

        let Ok(transition_type) = draft.transition_type.parse::<TransitionType>() else {
            violation(
                "transition_type",
                format!(
                    "'{}' is not one of promoted, retained, departed, transferred",
                    draft.transition_type
                ),
            );
            continue;
        };

        match (transition_type.requires_target_class(), draft.target_class_id) {
            (false, Some(target)) => violation(
                "target_class_id",
                format!("departed students cannot have a target class (got {target})"),
            ),
            (true, None) => violation(
                "target_class_id",
                format!("required for {transition_type} transitions"),
            ),
            (true, Some(target)) if !target_class_ids.contains(&target) => violation(
                "target_class_id",
                format!("class {target} is not a class of the target year"),
            ),
            _ => {}
        }

        validated.push(ValidatedTransition {
            student_id: draft.student_id,
            source_class_id: draft.source_class_id,
            target_class_id: draft.target_class_id,
            transition_type,
        });
    }

    if violations.is_empty() {
        Ok(validated)
    } else {
        Err(DomainError::InvalidTransitionBatch(violations))
    }
}
