//! Physical locations where duties take place.

use super::{CatalogCode, CatalogDomainError, LocationId, ParseCatalogValueError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Kind of physical zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// Teaching room.
    Classroom,
    /// Entry or exit gate.
    Gate,
    /// Assembly or examination hall.
    Hall,
    /// Playground or sports field.
    Field,
    /// Administrative office.
    Office,
    /// Science or computer laboratory.
    Laboratory,
    /// Bus bay or pick-up zone.
    TransportBay,
    /// Anything else.
    Other,
}

impl LocationType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classroom => "classroom",
            Self::Gate => "gate",
            Self::Hall => "hall",
            Self::Field => "field",
            Self::Office => "office",
            Self::Laboratory => "laboratory",
            Self::TransportBay => "transport_bay",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for LocationType {
    type Error = ParseCatalogValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "classroom" => Ok(Self::Classroom),
            "gate" => Ok(Self::Gate),
            "hall" => Ok(Self::Hall),
            "field" => Ok(Self::Field),
            "office" => Ok(Self::Office),
            "laboratory" => Ok(Self::Laboratory),
            "transport_bay" => Ok(Self::TransportBay),
            "other" => Ok(Self::Other),
            _ => Err(ParseCatalogValueError::new("location type", value)),
        }
    }
}

/// Unvalidated location fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDraft {
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Zone type.
    pub location_type: LocationType,
    /// Building name.
    pub building: Option<String>,
    /// Floor label.
    pub floor: Option<String>,
    /// Advisory capacity.
    pub capacity: Option<u32>,
}

impl LocationDraft {
    /// Creates a draft with only the required fields.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        location_type: LocationType,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            location_type,
            building: None,
            floor: None,
            capacity: None,
        }
    }
}

/// Validated location. Capacity is advisory and never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    code: CatalogCode,
    name: String,
    location_type: LocationType,
    building: Option<String>,
    floor: Option<String>,
    capacity: Option<u32>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLocation {
    /// Persisted identifier.
    pub id: LocationId,
    /// Persisted code.
    pub code: CatalogCode,
    /// Persisted name.
    pub name: String,
    /// Persisted zone type.
    pub location_type: LocationType,
    /// Persisted building.
    pub building: Option<String>,
    /// Persisted floor.
    pub floor: Option<String>,
    /// Persisted capacity.
    pub capacity: Option<u32>,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn validate_draft(draft: &LocationDraft) -> Result<(CatalogCode, String), CatalogDomainError> {
    let code = CatalogCode::new(draft.code.as_str())?;
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CatalogDomainError::EmptyName);
    }
    if draft.capacity == Some(0) {
        return Err(CatalogDomainError::ZeroCapacity);
    }
    Ok((code, name.to_owned()))
}

impl Location {
    /// Validates a draft and creates an active location.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when any field fails validation.
    pub fn new(draft: LocationDraft, clock: &impl Clock) -> Result<Self, CatalogDomainError> {
        let (code, name) = validate_draft(&draft)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: LocationId::new(),
            code,
            name,
            location_type: draft.location_type,
            building: draft.building,
            floor: draft.floor,
            capacity: draft.capacity,
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a location from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedLocation) -> Self {
        Self {
            id: data.id,
            code: data.code,
            name: data.name,
            location_type: data.location_type,
            building: data.building,
            floor: data.floor,
            capacity: data.capacity,
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
        draft: LocationDraft,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        let (code, name) = validate_draft(&draft)?;
        self.code = code;
        self.name = name;
        self.location_type = draft.location_type;
        self.building = draft.building;
        self.floor = draft.floor;
        self.capacity = draft.capacity;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Soft-deletes the location.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.updated_at = clock.utc();
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> LocationId {
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

    /// Returns the zone type.
    #[must_use]
    pub const fn location_type(&self) -> LocationType {
        self.location_type
    }

    /// Returns the building.
    #[must_use]
    pub fn building(&self) -> Option<&str> {
        self.building.as_deref()
    }

    /// Returns the floor.
    #[must_use]
    pub fn floor(&self) -> Option<&str> {
        self.floor.as_deref()
    }

    /// Returns the advisory capacity.
    #[must_use]
    pub const fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// Returns whether the location is active.
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
