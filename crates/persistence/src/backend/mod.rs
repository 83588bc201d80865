// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Backend-specific code is limited to:
//!
//! - Connection initialization
//! - Migration execution
//! - Connection configuration (PRAGMA statements)
//!
//! All domain queries and mutations live in `queries/` and `mutations/`
//! and use Diesel DSL only.

pub mod sqlite;
