//! Roster roles such as lead or assistant on a duty.

use super::{CatalogCode, CatalogDomainError, RoleId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Unvalidated role fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl RoleDraft {
    /// Creates a draft without a description.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// Validated roster role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    code: CatalogCode,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRole {
    /// Persisted identifier.
    pub id: RoleId,
    /// Persisted code.
    pub code: CatalogCode,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn validate_draft(draft: &RoleDraft) -> Result<(CatalogCode, String), CatalogDomainError> {
    let code = CatalogCode::new(draft.code.as_str())?;
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CatalogDomainError::EmptyName);
    }
    Ok((code, name.to_owned()))
}

impl Role {
    /// Validates a draft and creates an active role.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when any field fails validation.
    pub fn new(draft: RoleDraft, clock: &impl Clock) -> Result<Self, CatalogDomainError> {
        let (code, name) = validate_draft(&draft)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: RoleId::new(),
            code,
            name,
            description: draft.description,
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a role from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedRole) -> Self {
        Self {
            id: data.id,
            code: data.code,
            name: data.name,
            description: data.description,
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
        draft: RoleDraft,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        let (code, name) = validate_draft(&draft)?;
        self.code = code;
        self.name = name;
        self.description = draft.description;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Soft-deletes the role.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.updated_at = clock.utc();
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> RoleId {
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

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the role is active.
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
