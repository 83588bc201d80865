// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use rollover_domain::ClassMapping;

use crate::data_models::ClassMappingRow;
use crate::diesel_schema::class_mappings;
use crate::error::PersistenceError;

/// Lists the mappings of a preparation, in creation order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_mappings(
    conn: &mut SqliteConnection,
    preparation_id: i64,
) -> Result<Vec<ClassMapping>, PersistenceError> {
    Ok(class_mappings::table
        .filter(class_mappings::preparation_id.eq(preparation_id))
        .order(class_mappings::mapping_id.asc())
        .select(ClassMappingRow::as_select())
        .load(conn)?
        .into_iter()
        .map(ClassMapping::from)
        .collect())
}
