//! Behaviour shared by every master catalog.

use super::{
    CatalogCode, CatalogDomainError, DutyDefinition, DutyDefinitionDraft, DutyDefinitionId,
    Location, LocationDraft, LocationId, Role, RoleDraft, RoleId, TimeSlot, TimeSlotDraft,
    TimeSlotId,
};
use mockable::Clock;
use std::fmt;
use std::hash::Hash;

/// Which master catalog an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    /// Duty definitions.
    DutyDefinition,
    /// Time slots.
    TimeSlot,
    /// Locations.
    Location,
    /// Roster roles.
    Role,
}

impl CatalogKind {
    /// Returns a stable label used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DutyDefinition => "duty_definition",
            Self::TimeSlot => "time_slot",
            Self::Location => "location",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A soft-deletable, code-addressed catalog entry.
pub trait CatalogEntry: Clone + fmt::Debug + Send + Sync + 'static {
    /// Identifier type.
    type Id: Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// Unvalidated input used for creation and updates.
    type Draft: Send + 'static;

    /// Catalog the entry belongs to.
    const KIND: CatalogKind;

    /// Validates a draft into a new active entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when the draft is invalid.
    fn create(draft: Self::Draft, clock: &impl Clock) -> Result<Self, CatalogDomainError>;

    /// Applies a validated draft to an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when the draft is invalid.
    fn update(&mut self, draft: Self::Draft, clock: &impl Clock) -> Result<(), CatalogDomainError>;

    /// Marks the entry inactive.
    fn retire(&mut self, clock: &impl Clock);

    /// Returns the identifier.
    fn entry_id(&self) -> Self::Id;

    /// Returns the tenant-unique code.
    fn entry_code(&self) -> &CatalogCode;

    /// Returns whether the entry may be referenced by new assignments.
    fn entry_is_active(&self) -> bool;
}

macro_rules! impl_catalog_entry {
    ($entry:ty, $id:ty, $draft:ty, $kind:ident) => {
        impl CatalogEntry for $entry {
            type Id = $id;
            type Draft = $draft;

            const KIND: CatalogKind = CatalogKind::$kind;

            fn create(draft: Self::Draft, clock: &impl Clock) -> Result<Self, CatalogDomainError> {
                Self::new(draft, clock)
            }

            fn update(
                &mut self,
                draft: Self::Draft,
                clock: &impl Clock,
            ) -> Result<(), CatalogDomainError> {
                self.apply(draft, clock)
            }

            fn retire(&mut self, clock: &impl Clock) {
                self.deactivate(clock);
            }

            fn entry_id(&self) -> Self::Id {
                self.id()
            }

            fn entry_code(&self) -> &CatalogCode {
                self.code()
            }

            fn entry_is_active(&self) -> bool {
                self.is_active()
            }
        }
    };
}

impl_catalog_entry!(DutyDefinition, DutyDefinitionId, DutyDefinitionDraft, DutyDefinition);
impl_catalog_entry!(TimeSlot, TimeSlotId, TimeSlotDraft, TimeSlot);
impl_catalog_entry!(Location, LocationId, LocationDraft, Location);
impl_catalog_entry!(Role, RoleId, RoleDraft, Role);
