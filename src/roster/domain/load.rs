//! Weekly duty caps for student assignees.

use super::{AssigneeRef, Booking};
use chrono::{Datelike, IsoWeek, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A proposed assignment would push a student past the weekly cap.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{assignee} has {current} duties in {year}-W{week:02}; {requested} more exceeds cap {cap}")]
pub struct CapacityBreach {
    /// Student concerned.
    pub assignee: AssigneeRef,
    /// ISO year of the breached week.
    pub year: i32,
    /// ISO week number.
    pub week: u32,
    /// Bookings already held that week.
    pub current: u32,
    /// Bookings the request adds that week.
    pub requested: u32,
    /// Configured cap.
    pub cap: u16,
}

/// Counts bookings per ISO week for one assignee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyLoad {
    weeks: BTreeMap<(i32, u32), u32>,
}

fn week_key(week: IsoWeek) -> (i32, u32) {
    (week.year(), week.week())
}

impl WeeklyLoad {
    /// Tallies the live and completed bookings of `assignee`.
    #[must_use]
    pub fn from_bookings<'a>(
        assignee: &AssigneeRef,
        bookings: impl IntoIterator<Item = &'a Booking>,
    ) -> Self {
        let mut load = Self::default();
        for booking in bookings {
            if booking.assignee == *assignee && booking.status.is_booking() {
                load.add(booking.date);
            }
        }
        load
    }

    /// Adds one booking on `date`.
    pub fn add(&mut self, date: NaiveDate) {
        *self.weeks.entry(week_key(date.iso_week())).or_insert(0) += 1;
    }

    /// Returns the bookings in the ISO week containing `date`.
    #[must_use]
    pub fn in_week_of(&self, date: NaiveDate) -> u32 {
        self.weeks
            .get(&week_key(date.iso_week()))
            .copied()
            .unwrap_or_default()
    }

    /// Checks that adding `dates` keeps every touched week within `cap`.
    ///
    /// A week is rejected only when `current + new > cap`.
    ///
    /// # Errors
    ///
    /// Returns the first breached week in calendar order.
    pub fn check(
        &self,
        assignee: &AssigneeRef,
        dates: &[NaiveDate],
        cap: u16,
    ) -> Result<(), CapacityBreach> {
        let mut requested = Self::default();
        for date in dates {
            requested.add(*date);
        }
        for (&(year, week), &added) in &requested.weeks {
            let current = self.weeks.get(&(year, week)).copied().unwrap_or_default();
            if current.saturating_add(added) > u32::from(cap) {
                return Err(CapacityBreach {
                    assignee: assignee.clone(),
                    year,
                    week,
                    current,
                    requested: added,
                    cap,
                });
            }
        }
        Ok(())
    }
}
