//! Recurrence patterns and their expansion into concrete dates.

use super::RosterDomainError;
use crate::catalog::domain::WeekdaySet;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const FORTNIGHT_DAYS: i64 = 14;

/// When an assignment happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum Recurrence {
    /// A single day.
    Once {
        /// The day.
        date: NaiveDate,
    },
    /// Every week on the given weekdays between `start` and `end`
    /// inclusive.
    Weekly {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
        /// Days of the week on which the duty occurs.
        weekdays: WeekdaySet,
    },
    /// Every other week, counted from the ISO week containing `start`.
    Fortnightly {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
        /// Days of the week on which the duty occurs.
        weekdays: WeekdaySet,
    },
}

impl Recurrence {
    /// Returns the first day the pattern can produce.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        match self {
            Self::Once { date } => *date,
            Self::Weekly { start, .. } | Self::Fortnightly { start, .. } => *start,
        }
    }

    /// Returns the last day the pattern can produce.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        match self {
            Self::Once { date } => *date,
            Self::Weekly { end, .. } | Self::Fortnightly { end, .. } => *end,
        }
    }

    /// Expands the pattern into sorted, distinct dates.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::InvalidDateRange`] when `end < start`,
    /// [`RosterDomainError::EmptyRecurrence`] when no date matches, and
    /// [`RosterDomainError::TooManyOccurrences`] when more than `max` dates
    /// match.
    pub fn expand(&self, max: u16) -> Result<Vec<NaiveDate>, RosterDomainError> {
        let (start, end, weekdays, fortnightly) = match *self {
            Self::Once { date } => return Ok(vec![date]),
            Self::Weekly {
                start,
                end,
                weekdays,
            } => (start, end, weekdays, false),
            Self::Fortnightly {
                start,
                end,
                weekdays,
            } => (start, end, weekdays, true),
        };
        if end < start {
            return Err(RosterDomainError::InvalidDateRange { start, end });
        }

        let anchor = week_start(start);
        let mut dates = Vec::new();
        for day in start.iter_days().take_while(|day| *day <= end) {
            if !weekdays.contains(day.weekday()) {
                continue;
            }
            if fortnightly && (week_start(day) - anchor).num_days().rem_euclid(FORTNIGHT_DAYS) != 0
            {
                continue;
            }
            if dates.len() >= usize::from(max) {
                return Err(RosterDomainError::TooManyOccurrences { max });
            }
            dates.push(day);
        }

        if dates.is_empty() {
            return Err(RosterDomainError::EmptyRecurrence);
        }
        Ok(dates)
    }
}

/// Monday of the ISO week containing `date`.
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}
