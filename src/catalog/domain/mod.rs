//! Domain model for the master catalogs.
//!
//! Every catalog entry carries a tenant-unique [`CatalogCode`] and an
//! `is_active` flag. Validation happens when drafts are turned into entries,
//! so a constructed entry always satisfies its invariants.

mod assignee;
mod code;
mod duty;
mod entry;
mod error;
mod ids;
mod location;
mod role;
mod slot;
mod time;

pub use assignee::{AssigneeKind, AssigneeKindSet};
pub use code::CatalogCode;
pub use duty::{
    AssigneeBounds, DutyCategory, DutyDefinition, DutyDefinitionDraft, PersistedDutyDefinition,
    RiskLevel,
};
pub use entry::{CatalogEntry, CatalogKind};
pub use error::{CatalogDomainError, ParseCatalogValueError};
pub use ids::{DutyDefinitionId, LocationId, RoleId, TimeSlotId};
pub use location::{Location, LocationDraft, LocationType, PersistedLocation};
pub use role::{PersistedRole, Role, RoleDraft};
pub use slot::{PersistedTimeSlot, TimeSlot, TimeSlotDraft};
pub use time::{TimeWindow, WeekdaySet};
