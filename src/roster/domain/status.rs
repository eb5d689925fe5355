//! Closed status sets for assignments and their occurrences.

use super::ParseRosterValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a roster assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Waiting for an administrator to approve a risky duty.
    PendingApproval,
    /// At least one occurrence awaits the assignee's response.
    PendingAcceptance,
    /// Confirmed; no occurrence awaits a response.
    Scheduled,
    /// Every occurrence is settled and at least one was carried out.
    Completed,
    /// Withdrawn by an administrator.
    Cancelled,
}

impl AssignmentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::PendingAcceptance => "pending_acceptance",
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether occurrences may be accepted, declined, or completed.
    #[must_use]
    pub const fn admits_occurrence_changes(self) -> bool {
        matches!(self, Self::PendingAcceptance | Self::Scheduled)
    }

    /// Returns whether the transition `self -> next` is permitted.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::PendingApproval,
                Self::PendingAcceptance | Self::Scheduled | Self::Cancelled
            ) | (
                Self::PendingAcceptance,
                Self::Scheduled | Self::Completed | Self::Cancelled
            ) | (Self::Scheduled, Self::Completed | Self::Cancelled)
        )
    }

    /// Derives the status implied by the occurrence statuses.
    ///
    /// Approval-pending and terminal assignments keep their status. Otherwise
    /// the assignment is completed once every occurrence is terminal and at
    /// least one was completed, scheduled once none awaits acceptance, and
    /// pending acceptance while any does.
    #[must_use]
    pub fn settle(self, occurrences: &[OccurrenceStatus]) -> Self {
        if !self.admits_occurrence_changes() {
            return self;
        }
        let all_terminal = occurrences.iter().all(|status| status.is_terminal());
        let any_completed = occurrences.contains(&OccurrenceStatus::Completed);
        if all_terminal && any_completed {
            return Self::Completed;
        }
        if occurrences.contains(&OccurrenceStatus::PendingAcceptance) {
            Self::PendingAcceptance
        } else {
            Self::Scheduled
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AssignmentStatus {
    type Error = ParseRosterValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending_approval" => Ok(Self::PendingApproval),
            "pending_acceptance" => Ok(Self::PendingAcceptance),
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseRosterValueError::new("assignment status", value)),
        }
    }
}

/// Status of one dated occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    /// Confirmed without needing acceptance.
    Scheduled,
    /// Awaiting the assignee's response.
    PendingAcceptance,
    /// Accepted by the assignee.
    Accepted,
    /// Declined by the assignee.
    Declined,
    /// Carried out.
    Completed,
    /// Withdrawn.
    Cancelled,
}

impl OccurrenceStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::PendingAcceptance => "pending_acceptance",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Declined | Self::Completed | Self::Cancelled)
    }

    /// Returns whether the occurrence is still expected to happen.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Scheduled | Self::PendingAcceptance | Self::Accepted)
    }

    /// Returns whether the occurrence occupies the assignee's time for
    /// conflict and weekly-cap purposes.
    #[must_use]
    pub const fn is_booking(self) -> bool {
        self.is_live() || matches!(self, Self::Completed)
    }

    /// Returns whether the transition `self -> next` is permitted.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (
                Self::PendingAcceptance,
                Self::Accepted | Self::Declined | Self::Cancelled
            ) | (Self::Accepted | Self::Scheduled, Self::Completed | Self::Cancelled)
        )
    }

    /// All statuses counted as bookings.
    pub const BOOKINGS: [Self; 4] = [
        Self::Scheduled,
        Self::PendingAcceptance,
        Self::Accepted,
        Self::Completed,
    ];
}

impl fmt::Display for OccurrenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OccurrenceStatus {
    type Error = ParseRosterValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "scheduled" => Ok(Self::Scheduled),
            "pending_acceptance" => Ok(Self::PendingAcceptance),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseRosterValueError::new("occurrence status", value)),
        }
    }
}
