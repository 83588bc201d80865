// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The roster and school-year stores the workflow reads from.
//!
//! Both are served by the same database as the workflow tables, so a
//! promotion batch can enroll students inside its own transaction.

use rollover_domain::{Enrollment, NewSchoolYear, SchoolClass, SchoolYear};

use crate::error::PersistenceError;
use crate::{Persistence, mutations, queries};

/// Read access to classes and enrollments, plus enrollment creation.
pub trait RosterSource {
    /// Lists every class of a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_classes(&mut self, year_id: i64) -> Result<Vec<SchoolClass>, PersistenceError>;

    /// Lists the enrollments of a class in a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_enrollments(
        &mut self,
        class_id: i64,
        year_id: i64,
    ) -> Result<Vec<Enrollment>, PersistenceError>;

    /// Enrolls a student in a class.
    ///
    /// # Errors
    ///
    /// Returns an error if the class or year does not exist.
    fn create_enrollment(
        &mut self,
        student_id: i64,
        class_id: i64,
        year_id: i64,
    ) -> Result<Enrollment, PersistenceError>;
}

/// Access to the school-year records.
pub trait SchoolYearRegistry {
    /// Retrieves a year.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the year does not exist.
    fn get_year(&mut self, year_id: i64) -> Result<SchoolYear, PersistenceError>;

    /// Finds the year following `current_year_id` for the same school.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the current year does not exist.
    fn find_next_year(&mut self, current_year_id: i64)
    -> Result<Option<SchoolYear>, PersistenceError>;

    /// Creates a year.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the label is taken.
    fn create_year(&mut self, year: &NewSchoolYear) -> Result<SchoolYear, PersistenceError>;

    /// Lists a school's years by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_years(&mut self, school_id: i64) -> Result<Vec<SchoolYear>, PersistenceError>;
}

impl RosterSource for Persistence {
    fn list_classes(&mut self, year_id: i64) -> Result<Vec<SchoolClass>, PersistenceError> {
        queries::classes::list_classes(&mut self.conn, year_id)
    }

    fn list_enrollments(
        &mut self,
        class_id: i64,
        year_id: i64,
    ) -> Result<Vec<Enrollment>, PersistenceError> {
        queries::enrollments::list_enrollments(&mut self.conn, class_id, year_id)
    }

    fn create_enrollment(
        &mut self,
        student_id: i64,
        class_id: i64,
        year_id: i64,
    ) -> Result<Enrollment, PersistenceError> {
        let created_at: String = crate::data_models::now_timestamp()?;
        mutations::enrollments::insert_enrollment(
            &mut self.conn,
            student_id,
            class_id,
            year_id,
            &created_at,
        )
    }
}

impl SchoolYearRegistry for Persistence {
    fn get_year(&mut self, year_id: i64) -> Result<SchoolYear, PersistenceError> {
        queries::years::get_year(&mut self.conn, year_id)
    }

    fn find_next_year(
        &mut self,
        current_year_id: i64,
    ) -> Result<Option<SchoolYear>, PersistenceError> {
        let current: SchoolYear = queries::years::get_year(&mut self.conn, current_year_id)?;
        queries::years::find_next_year(&mut self.conn, &current)
    }

    fn create_year(&mut self, year: &NewSchoolYear) -> Result<SchoolYear, PersistenceError> {
        mutations::years::insert_year(&mut self.conn, year)
    }

    fn list_years(&mut self, school_id: i64) -> Result<Vec<SchoolYear>, PersistenceError> {
        queries::years::list_years(&mut self.conn, school_id)
    }
}
