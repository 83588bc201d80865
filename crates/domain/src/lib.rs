// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod preparation_status;
mod school_year;
mod transition;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::{DomainError, TransitionViolation};
pub use preparation_status::PreparationStatus;
pub use school_year::{NewSchoolYear, SchoolYear, format_date, parse_date, successor_label};
pub use transition::{DraftTransition, StudentTransition, TransitionType, ValidatedTransition};
pub use types::{ClassMapping, Enrollment, Preparation, SchoolClass};
pub use validation::{validate_class_name, validate_target_year, validate_transition_batch};
