// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `years`: School year lookups
//! - `classes`: Class lookups per year
//! - `enrollments`: Enrollment lookups per class and year
//! - `preparations`: Preparation lookups
//! - `mappings`: Class mapping lookups
//! - `transitions`: Student transition audit rows

pub mod classes;
pub mod enrollments;
pub mod mappings;
pub mod preparations;
pub mod transitions;
pub mod years;
