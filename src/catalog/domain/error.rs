//! Error types for catalog validation and parsing.

use chrono::NaiveTime;
use thiserror::Error;

/// Errors returned while constructing catalog domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// The catalog code is empty after trimming.
    #[error("catalog code must not be empty")]
    EmptyCode,

    /// The catalog code contains characters outside `[A-Z0-9_-]` or exceeds
    /// the storage limit.
    #[error("invalid catalog code '{0}', expected 1-50 characters of [A-Z0-9_-]")]
    InvalidCode(String),

    /// A display name is empty after trimming.
    #[error("catalog entry name must not be empty")]
    EmptyName,

    /// A duty must allow at least one assignee kind.
    #[error("a duty must allow at least one assignee kind")]
    EmptyAssigneeKinds,

    /// The minimum assignee count exceeds the maximum.
    #[error("min_assignees ({min}) must not exceed max_assignees ({max})")]
    InvalidAssigneeBounds {
        /// Requested minimum.
        min: u16,
        /// Requested maximum.
        max: u16,
    },

    /// A maximum of zero assignees can never be satisfied.
    #[error("max_assignees must be at least 1")]
    ZeroMaxAssignees,

    /// A weekly cap was given for a duty students cannot take.
    #[error("student_weekly_cap is only valid for duties that allow students")]
    WeeklyCapWithoutStudents,

    /// A weekly cap of zero would block every student assignment.
    #[error("student_weekly_cap must be at least 1")]
    ZeroWeeklyCap,

    /// The time window is empty or inverted.
    #[error("time window start {start} must be before end {end}")]
    InvalidTimeWindow {
        /// Window start.
        start: NaiveTime,
        /// Window end.
        end: NaiveTime,
    },

    /// A weekday set must contain at least one day.
    #[error("weekday set must contain at least one day")]
    EmptyWeekdays,

    /// A stored weekday bitmask has bits outside the seven weekdays.
    #[error("invalid weekday mask {0:#09b}")]
    InvalidWeekdayMask(u8),

    /// Location capacity must be positive when present.
    #[error("location capacity must be at least 1 when provided")]
    ZeroCapacity,
}

/// Error returned while parsing a catalog enum from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {field}: {value}")]
pub struct ParseCatalogValueError {
    /// Name of the field being parsed.
    pub field: &'static str,
    /// Rejected value.
    pub value: String,
}

impl ParseCatalogValueError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}
