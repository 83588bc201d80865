// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use rollover_domain::SchoolClass;

/// Computes which class names must be created to duplicate a source year.
///
/// Only active, non-archived source classes are duplicated. A name is
/// skipped when the target year already has a class with that name, so
/// re-running the duplication creates nothing. Source classes sharing a
/// name yield a single entry. Names are compared after trimming.
///
/// # Arguments
///
/// * `source_classes` - All classes of the source year
/// * `existing_target_names` - Names of the classes already in the target year
///
/// # Returns
///
/// The names to create, in source order.
#[must_use]
pub fn plan_duplication(
    source_classes: &[SchoolClass],
    existing_target_names: &[String],
) -> Vec<String> {
    let mut taken: HashSet<&str> = existing_target_names.iter().map(|n| n.trim()).collect();
    let mut to_create: Vec<String> = Vec::new();

    for class in source_classes.iter().filter(|c| c.is_transitionable()) {
        let name = class.name.trim();
        if name.is_empty() || !taken.insert(name) {
            continue;
        }
        to_create.push(name.to_string());
    }

    to_create
}
