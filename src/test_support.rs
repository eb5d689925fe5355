//! Shared fixtures for unit tests.

use crate::tenant::domain::{OrgSettings, TenantCode, TenantContext, TenantId};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to noon UTC on the given day.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).expect("valid time");
        Self(Utc.from_utc_datetime(&noon))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds a context for a fresh tenant with the given settings.
pub fn tenant(code: &str, settings: OrgSettings) -> TenantContext {
    TenantContext::new(
        TenantId::new(),
        TenantCode::new(code).expect("valid tenant code"),
        settings,
    )
}

/// Parses an ISO date.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
}
