// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations for the persistence layer.
//!
//! Functions in this module take a plain connection. Multi-statement
//! operations are wrapped in an immediate transaction by the `Persistence`
//! adapter, so the reads they perform and the writes they issue see the
//! same database state.
//!
//! ## Module Organization
//!
//! - `years`: School year creation
//! - `classes`: Class creation and duplication
//! - `enrollments`: Enrollment creation
//! - `preparations`: Preparation creation and status changes
//! - `mappings`: Class mapping creation and deletion
//! - `promotion`: The transactional promotion batch

pub mod classes;
pub mod enrollments;
pub mod mappings;
pub mod preparations;
pub mod promotion;
pub mod years;

pub use promotion::ApplyOutcome;
