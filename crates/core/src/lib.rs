// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure planning for the year-transition workflow.
//!
//! Nothing in this crate touches storage. The persistence layer feeds it
//! snapshots of classes, mappings, enrollments and audit rows, and applies
//! the plans it returns inside its own transactions.

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

mod duplication;
mod mapping;
mod promotion;

#[cfg(test)]
mod tests;

pub use duplication::plan_duplication;
pub use mapping::{MappingProgress, default_drafts, is_complete, mapping_progress};
pub use promotion::{PromotionPlan, outstanding_students, plan_promotion};
