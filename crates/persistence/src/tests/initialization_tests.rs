// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{TEST_SCHOOL_ID, create_source_year};
use crate::{Persistence, PersistenceError, SchoolYearRegistry};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    create_source_year(&mut db1);

    assert_eq!(db1.list_years(TEST_SCHOOL_ID).unwrap().len(), 1);
    assert!(db2.list_years(TEST_SCHOOL_ID).unwrap().is_empty());
}

#[test]
fn test_class_in_unknown_year_is_rejected_by_foreign_key() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.create_class(999, "6A", true, false);

    assert!(matches!(
        result,
        Err(PersistenceError::ForeignKeyViolation(_))
    ));
}

#[test]
fn test_file_database_can_be_reopened() {
    let path = std::env::temp_dir().join(format!(
        "rollover_reopen_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        create_source_year(&mut persistence);
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.list_years(TEST_SCHOOL_ID).unwrap().len(), 1);

    drop(reopened);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
