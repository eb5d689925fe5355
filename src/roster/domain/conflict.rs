//! Conflict detection between proposed and existing bookings.

use super::{AssigneeRef, AssignmentId, AssignmentOccurrence, OccurrenceId, OccurrenceStatus};
use crate::catalog::domain::{DutyDefinitionId, TimeWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An existing occurrence that occupies an assignee's time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Parent assignment.
    pub assignment_id: AssignmentId,
    /// Occurrence.
    pub occurrence_id: OccurrenceId,
    /// Duty being carried out.
    pub duty_id: DutyDefinitionId,
    /// Booked assignee.
    pub assignee: AssigneeRef,
    /// Calendar date.
    pub date: NaiveDate,
    /// Booked window.
    pub window: TimeWindow,
    /// Occurrence status.
    pub status: OccurrenceStatus,
}

impl From<&AssignmentOccurrence> for Booking {
    fn from(occurrence: &AssignmentOccurrence) -> Self {
        Self {
            assignment_id: occurrence.assignment_id(),
            occurrence_id: occurrence.id(),
            duty_id: occurrence.duty_id(),
            assignee: occurrence.assignee().clone(),
            date: occurrence.date(),
            window: occurrence.window(),
            status: occurrence.status(),
        }
    }
}

/// Availability of one assignee on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "availability", content = "bookings", rename_all = "snake_case")]
pub enum DateAvailability {
    /// No overlapping booking.
    Free,
    /// Overlapping bookings, ordered by start time.
    Conflicted(Vec<Booking>),
}

/// Availability of one assignee on one proposed date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCheck {
    /// Proposed date.
    pub date: NaiveDate,
    /// Availability on that date.
    pub availability: DateAvailability,
}

/// Availability of one assignee across every proposed date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeAvailability {
    /// Assignee checked.
    pub assignee: AssigneeRef,
    /// One entry per proposed date, in date order.
    pub dates: Vec<DateCheck>,
}

/// Result of checking proposed bookings against existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    window: TimeWindow,
    assignees: Vec<AssigneeAvailability>,
}

/// A single conflicting pair surfaced by [`ConflictReport::conflicts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict<'a> {
    /// Assignee double-booked.
    pub assignee: &'a AssigneeRef,
    /// Date of the clash.
    pub date: NaiveDate,
    /// Existing bookings that overlap the proposed window.
    pub bookings: &'a [Booking],
}

impl ConflictReport {
    /// Checks `assignees` on `dates` within `window` against `bookings`.
    ///
    /// Only bookings of the same assignee on the same date whose status
    /// counts as a booking and whose window overlaps are conflicts; windows
    /// that merely touch are free.
    #[must_use]
    pub fn build(
        window: TimeWindow,
        assignees: &[AssigneeRef],
        dates: &[NaiveDate],
        bookings: &[Booking],
    ) -> Self {
        let checked = assignees
            .iter()
            .map(|assignee| AssigneeAvailability {
                assignee: assignee.clone(),
                dates: dates
                    .iter()
                    .map(|date| DateCheck {
                        date: *date,
                        availability: availability(&window, assignee, *date, bookings),
                    })
                    .collect(),
            })
            .collect();
        Self {
            window,
            assignees: checked,
        }
    }

    /// Returns the proposed window.
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        self.window
    }

    /// Returns availability per assignee.
    #[must_use]
    pub fn assignees(&self) -> &[AssigneeAvailability] {
        &self.assignees
    }

    /// Returns whether any assignee is double-booked.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        self.conflicts().next().is_some()
    }

    /// Iterates over every conflicting assignee and date.
    pub fn conflicts(&self) -> impl Iterator<Item = Conflict<'_>> {
        self.assignees.iter().flat_map(|entry| {
            entry.dates.iter().filter_map(move |check| match &check.availability {
                DateAvailability::Free => None,
                DateAvailability::Conflicted(bookings) => Some(Conflict {
                    assignee: &entry.assignee,
                    date: check.date,
                    bookings,
                }),
            })
        })
    }
}

fn availability(
    window: &TimeWindow,
    assignee: &AssigneeRef,
    date: NaiveDate,
    bookings: &[Booking],
) -> DateAvailability {
    let mut clashes: Vec<Booking> = bookings
        .iter()
        .filter(|booking| {
            booking.assignee == *assignee
                && booking.date == date
                && booking.status.is_booking()
                && booking.window.overlaps(window)
        })
        .cloned()
        .collect();
    if clashes.is_empty() {
        return DateAvailability::Free;
    }
    clashes.sort_by_key(|booking| booking.window.start());
    DateAvailability::Conflicted(clashes)
}
