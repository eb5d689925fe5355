//! Time-of-day windows and weekday sets shared by slots and assignments.

use super::CatalogDomainError;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open time-of-day window `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = CatalogDomainError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidTimeWindow`] unless
    /// `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, CatalogDomainError> {
        if start >= end {
            return Err(CatalogDomainError::InvalidTimeWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the window start.
    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// Returns the window end.
    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Returns whether the two windows share any instant.
    ///
    /// Windows that only touch (`self.end == other.start`) do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Returns the window length in whole minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Non-empty set of weekdays stored as a seven-bit mask (bit 0 is Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    const ALL_BITS: u8 = 0b111_1111;
    const WEEKDAY_BITS: u8 = 0b001_1111;

    /// Monday to Friday.
    #[must_use]
    pub const fn school_days() -> Self {
        Self(Self::WEEKDAY_BITS)
    }

    /// All seven days.
    #[must_use]
    pub const fn every_day() -> Self {
        Self(Self::ALL_BITS)
    }

    /// Creates a set from the given days.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyWeekdays`] when no day is given.
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Result<Self, CatalogDomainError> {
        let bits = days
            .into_iter()
            .fold(0_u8, |mask, day| mask | Self::bit(day));
        Self::from_bits(bits)
    }

    /// Reconstructs a set from its stored bitmask.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyWeekdays`] for a zero mask and
    /// [`CatalogDomainError::InvalidWeekdayMask`] when bits above Sunday are
    /// set.
    pub const fn from_bits(bits: u8) -> Result<Self, CatalogDomainError> {
        if bits == 0 {
            return Err(CatalogDomainError::EmptyWeekdays);
        }
        if bits & !Self::ALL_BITS != 0 {
            return Err(CatalogDomainError::InvalidWeekdayMask(bits));
        }
        Ok(Self(bits))
    }

    /// Returns the stored bitmask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns whether `day` is in the set.
    #[must_use]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Returns whether every day in `other` is also in `self`.
    #[must_use]
    pub const fn is_superset_of(self, other: Self) -> bool {
        other.0 & !self.0 == 0
    }

    /// Iterates over the days in the set from Monday to Sunday.
    pub fn days(self) -> impl Iterator<Item = Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(move |day| self.contains(*day))
    }

    fn bit(day: Weekday) -> u8 {
        1_u8 << day.num_days_from_monday()
    }
}

impl TryFrom<u8> for WeekdaySet {
    type Error = CatalogDomainError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<WeekdaySet> for u8 {
    fn from(set: WeekdaySet) -> Self {
        set.0
    }
}
