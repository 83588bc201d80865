// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Preparation status tracking and transition logic.
//!
//! A preparation moves strictly forward through four states. The stored
//! status is the single source of truth for which wizard step is active;
//! there is no other step state anywhere in the system.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Workflow states of a year-transition preparation.
///
/// The declaration order is the workflow order, so the derived `Ord`
/// can be used to compare progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreparationStatus {
    /// The preparation exists; no target classes confirmed yet.
    Initialized,
    /// Target-year classes have been provisioned.
    ClassesCreated,
    /// Every source class is mapped; mappings are frozen.
    MappingDone,
    /// Students have been promoted. Terminal.
    Completed,
}

impl PreparationStatus {
    /// All states in workflow order.
    pub const ALL: [Self; 4] = [
        Self::Initialized,
        Self::ClassesCreated,
        Self::MappingDone,
        Self::Completed,
    ];

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::ClassesCreated => "classes_created",
            Self::MappingDone => "mapping_done",
            Self::Completed => "completed",
        }
    }

    /// Returns the single legal successor, or `None` for the terminal state.
    #[must_use]
    pub const fn successor(&self) -> Option<Self> {
        match self {
            Self::Initialized => Some(Self::ClassesCreated),
            Self::ClassesCreated => Some(Self::MappingDone),
            Self::MappingDone => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Returns true while target classes may still be created.
    #[must_use]
    pub const fn allows_class_changes(&self) -> bool {
        matches!(self, Self::Initialized | Self::ClassesCreated)
    }

    /// Returns true while class mappings may still be created or deleted.
    #[must_use]
    pub const fn allows_mapping_changes(&self) -> bool {
        matches!(self, Self::Initialized | Self::ClassesCreated)
    }

    /// Validates that `next` is the single legal successor of this status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` for backward moves,
    /// skipped steps, self-transitions and anything leaving `completed`.
    pub fn validate_transition(&self, next: Self) -> Result<(), DomainError> {
        match self.successor() {
            Some(successor) if successor == next => Ok(()),
            Some(successor) => Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
                reason: format!("the only permitted next status is {}", successor.as_str()),
            }),
            None => Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            }),
        }
    }
}

impl FromStr for PreparationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initialized" => Ok(Self::Initialized),
            "classes_created" => Ok(Self::ClassesCreated),
            "mapping_done" => Ok(Self::MappingDone),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PreparationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
