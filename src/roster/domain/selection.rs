//! Where and when an assignment happens: catalog entries or custom values.

use super::RosterDomainError;
use crate::catalog::domain::{LocationId, TimeSlotId, TimeWindow};
use serde::{Deserialize, Serialize};

/// Time of day an assignment occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SlotSelection {
    /// A named slot from the catalog.
    Catalog {
        /// Selected slot.
        time_slot_id: TimeSlotId,
    },
    /// A one-off window that overrides the catalog.
    Custom {
        /// Custom window.
        window: TimeWindow,
    },
}

/// Place an assignment happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LocationSelection {
    /// A location from the catalog.
    Catalog {
        /// Selected location.
        location_id: LocationId,
    },
    /// Free-text description of an uncatalogued place.
    Custom {
        /// Description shown to the assignee.
        description: String,
    },
}

impl LocationSelection {
    /// Creates a custom location.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::EmptyCustomLocation`] for blank text.
    pub fn custom(description: impl Into<String>) -> Result<Self, RosterDomainError> {
        let raw = description.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RosterDomainError::EmptyCustomLocation);
        }
        Ok(Self::Custom {
            description: trimmed.to_owned(),
        })
    }

    /// Returns the catalog location, if one was selected.
    #[must_use]
    pub const fn location_id(&self) -> Option<LocationId> {
        match self {
            Self::Catalog { location_id } => Some(*location_id),
            Self::Custom { .. } => None,
        }
    }
}
