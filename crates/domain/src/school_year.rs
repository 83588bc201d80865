// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! School year records and successor derivation.

use time::{Date, Month};

use crate::error::DomainError;

const DATE_FORMAT: &[time::format_description::FormatItem<'_>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Parses an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as ISO `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// A persisted academic year of one school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolYear {
    pub year_id: i64,
    pub school_id: i64,
    pub label: String,
    pub start_date: Date,
    pub end_date: Date,
    pub is_current: bool,
    pub is_next: bool,
}

/// A school year that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSchoolYear {
    pub school_id: i64,
    pub label: String,
    pub start_date: Date,
    pub end_date: Date,
    pub is_current: bool,
    pub is_next: bool,
}

impl NewSchoolYear {
    /// Creates a validated school year record.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is blank or the end date does not
    /// follow the start date.
    pub fn new(
        school_id: i64,
        label: &str,
        start_date: Date,
        end_date: Date,
    ) -> Result<Self, DomainError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(DomainError::InvalidYearLabel(String::from(
                "label cannot be empty",
            )));
        }
        if end_date <= start_date {
            return Err(DomainError::InvalidYearRange {
                label: label.to_string(),
            });
        }
        Ok(Self {
            school_id,
            label: label.to_string(),
            start_date,
            end_date,
            is_current: false,
            is_next: false,
        })
    }

    /// Flags this year as the school's current year.
    #[must_use]
    pub const fn current(mut self) -> Self {
        self.is_current = true;
        self
    }

    /// Flags this year as the school's next year.
    #[must_use]
    pub const fn next(mut self) -> Self {
        self.is_next = true;
        self
    }
}

impl SchoolYear {
    /// Derives the year that follows this one.
    ///
    /// Dates move forward by one calendar year and the label is advanced
    /// (`2023-2024` becomes `2024-2025`). The result is flagged as the next year.
    ///
    /// # Errors
    ///
    /// Returns an error if the shifted dates overflow the supported range.
    pub fn successor(&self) -> Result<NewSchoolYear, DomainError> {
        let start_date = shift_one_year(self.start_date)?;
        let end_date = shift_one_year(self.end_date)?;
        let label = successor_label(&self.label)
            .unwrap_or_else(|| format!("{}-{}", start_date.year(), end_date.year()));

        Ok(NewSchoolYear::new(self.school_id, &label, start_date, end_date)?.next())
    }
}

/// Advances a `YYYY-YYYY` or `YYYY` label by one year.
///
/// Returns `None` for labels that do not follow either shape.
#[must_use]
pub fn successor_label(label: &str) -> Option<String> {
    let label = label.trim();
    let bump = |part: &str| -> Option<String> {
        if part.len() != 4 || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        part.parse::<u16>()
            .ok()
            .and_then(|y| y.checked_add(1))
            .map(|y| y.to_string())
    };

    match label.split_once('-') {
        Some((first, second)) => Some(format!("{}-{}", bump(first)?, bump(second)?)),
        None => bump(label),
    }
}

/// Moves a date forward by one calendar year, clamping 29 February to the 28th.
fn shift_one_year(date: Date) -> Result<Date, DomainError> {
    let overflow = || DomainError::DateArithmeticOverflow {
        operation: format!("shifting {} by one year", format_date(date)),
    };
    let year = date.year().checked_add(1).ok_or_else(overflow)?;

    match date.replace_year(year) {
        Ok(shifted) => Ok(shifted),
        Err(_) if date.month() == Month::February && date.day() == 29 => {
            Date::from_calendar_date(year, Month::February, 28).map_err(|_| overflow())
        }
        Err(_) => Err(overflow()),
    }
}
