//! Error types for roster domain validation and transitions.

use super::{AssignmentStatus, OccurrenceStatus};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or transitioning roster values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterDomainError {
    /// The assignee identifier is blank, contains whitespace, or is too long.
    #[error("invalid assignee id '{0}'")]
    InvalidAssigneeId(String),

    /// The actor identifier is blank, contains whitespace, or is too long.
    #[error("invalid actor id '{0}'")]
    InvalidActorId(String),

    /// A recurrence ends before it starts.
    #[error("recurrence end {end} is before start {start}")]
    InvalidDateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// A recurrence expands to no dates.
    #[error("recurrence does not produce any dates")]
    EmptyRecurrence,

    /// A recurrence expands beyond the organisation's ceiling.
    #[error("recurrence produces more than {max} occurrences")]
    TooManyOccurrences {
        /// Configured ceiling.
        max: u16,
    },

    /// A custom location description is blank.
    #[error("custom location must not be empty")]
    EmptyCustomLocation,

    /// A decline was submitted without a reason.
    #[error("a decline reason is required")]
    EmptyDeclineReason,

    /// A conflict override was requested without a reason.
    #[error("a conflict override reason is required")]
    EmptyOverrideReason,

    /// The assignment cannot move to the requested status.
    #[error("assignment cannot move from {from} to {to}")]
    InvalidAssignmentTransition {
        /// Current status.
        from: AssignmentStatus,
        /// Requested status.
        to: AssignmentStatus,
    },

    /// The occurrence cannot move to the requested status.
    #[error("occurrence cannot move from {from} to {to}")]
    InvalidOccurrenceTransition {
        /// Current status.
        from: OccurrenceStatus,
        /// Requested status.
        to: OccurrenceStatus,
    },

    /// An occurrence was completed before its date.
    #[error("occurrence on {date} cannot be completed before it happens (today is {today})")]
    CompletionBeforeDate {
        /// Occurrence date.
        date: NaiveDate,
        /// Current date.
        today: NaiveDate,
    },
}

impl RosterDomainError {
    /// Returns whether the error reports an illegal state change rather
    /// than malformed input.
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAssignmentTransition { .. }
                | Self::InvalidOccurrenceTransition { .. }
                | Self::CompletionBeforeDate { .. }
        )
    }
}

/// Error returned while parsing a roster enum from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {field}: {value}")]
pub struct ParseRosterValueError {
    /// Name of the field being parsed.
    pub field: &'static str,
    /// Rejected value.
    pub value: String,
}

impl ParseRosterValueError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}
