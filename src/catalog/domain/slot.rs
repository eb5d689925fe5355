//! Named recurring time slots.

use super::{CatalogCode, CatalogDomainError, TimeSlotId, TimeWindow, WeekdaySet};
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Unvalidated time slot fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotDraft {
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Start time of day.
    pub start: NaiveTime,
    /// End time of day.
    pub end: NaiveTime,
    /// Days on which the slot applies.
    pub weekdays: Vec<Weekday>,
}

impl TimeSlotDraft {
    /// Creates a draft that applies on school days.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            start,
            end,
            weekdays: WeekdaySet::school_days().days().collect(),
        }
    }

    /// Replaces the applicable weekdays.
    #[must_use]
    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }
}

/// Validated time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    id: TimeSlotId,
    code: CatalogCode,
    name: String,
    window: TimeWindow,
    weekdays: WeekdaySet,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted time slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTimeSlot {
    /// Persisted identifier.
    pub id: TimeSlotId,
    /// Persisted code.
    pub code: CatalogCode,
    /// Persisted name.
    pub name: String,
    /// Persisted window.
    pub window: TimeWindow,
    /// Persisted weekday set.
    pub weekdays: WeekdaySet,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn validate_draft(
    draft: TimeSlotDraft,
) -> Result<(CatalogCode, String, TimeWindow, WeekdaySet), CatalogDomainError> {
    let code = CatalogCode::new(draft.code)?;
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CatalogDomainError::EmptyName);
    }
    let window = TimeWindow::new(draft.start, draft.end)?;
    let weekdays = WeekdaySet::new(draft.weekdays)?;
    Ok((code, name.to_owned(), window, weekdays))
}

impl TimeSlot {
    /// Validates a draft and creates an active slot.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when any field fails validation.
    pub fn new(draft: TimeSlotDraft, clock: &impl Clock) -> Result<Self, CatalogDomainError> {
        let (code, name, window, weekdays) = validate_draft(draft)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TimeSlotId::new(),
            code,
            name,
            window,
            weekdays,
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a slot from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedTimeSlot) -> Self {
        Self {
            id: data.id,
            code: data.code,
            name: data.name,
            window: data.window,
            weekdays: data.weekdays,
            is_active: data.is_active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Replaces the editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when any field fails validation.
    pub fn apply(
        &mut self,
        draft: TimeSlotDraft,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        let (code, name, window, weekdays) = validate_draft(draft)?;
        self.code = code;
        self.name = name;
        self.window = window;
        self.weekdays = weekdays;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Soft-deletes the slot.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.updated_at = clock.utc();
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> TimeSlotId {
        self.id
    }

    /// Returns the code.
    #[must_use]
    pub const fn code(&self) -> &CatalogCode {
        &self.code
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the time window.
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        self.window
    }

    /// Returns the applicable weekdays.
    #[must_use]
    pub const fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    /// Returns whether the slot is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
