//! Repository port shared by every master catalog.

use crate::catalog::domain::{
    CatalogCode, CatalogEntry, CatalogKind, DutyDefinition, Location, Role, TimeSlot,
};
use crate::tenant::domain::TenantContext;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog repository operations.
pub type CatalogRepositoryResult<T> = Result<T, CatalogRepositoryError>;

/// Tenant-scoped persistence contract for one catalog.
///
/// Every call is scoped to `ctx.tenant_id()`; entries of other tenants are
/// invisible.
#[async_trait]
pub trait CatalogRepository<T: CatalogEntry>: Send + Sync {
    /// Stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateCode`] when another entry
    /// of the same catalog already uses the code.
    async fn insert(&self, ctx: &TenantContext, entry: &T) -> CatalogRepositoryResult<()>;

    /// Persists changes to an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::NotFound`] when the entry does not
    /// exist and [`CatalogRepositoryError::DuplicateCode`] when the new code
    /// collides with another entry.
    async fn update(&self, ctx: &TenantContext, entry: &T) -> CatalogRepositoryResult<()>;

    /// Finds an entry by identifier, active or not.
    async fn find_by_id(
        &self,
        ctx: &TenantContext,
        id: T::Id,
    ) -> CatalogRepositoryResult<Option<T>>;

    /// Finds an entry by code, active or not.
    async fn find_by_code(
        &self,
        ctx: &TenantContext,
        code: &CatalogCode,
    ) -> CatalogRepositoryResult<Option<T>>;

    /// Lists entries ordered by code.
    async fn list(
        &self,
        ctx: &TenantContext,
        include_inactive: bool,
    ) -> CatalogRepositoryResult<Vec<T>>;
}

/// Storage for all four master catalogs.
pub trait CatalogStore:
    CatalogRepository<DutyDefinition>
    + CatalogRepository<TimeSlot>
    + CatalogRepository<Location>
    + CatalogRepository<Role>
{
}

impl<S> CatalogStore for S where
    S: CatalogRepository<DutyDefinition>
        + CatalogRepository<TimeSlot>
        + CatalogRepository<Location>
        + CatalogRepository<Role>
{
}

/// Errors returned by catalog repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CatalogRepositoryError {
    /// Another entry of the catalog already uses the code.
    #[error("duplicate {kind} code: {code}")]
    DuplicateCode {
        /// Catalog concerned.
        kind: CatalogKind,
        /// Colliding code.
        code: CatalogCode,
    },

    /// The entry was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Catalog concerned.
        kind: CatalogKind,
        /// Rendered identifier.
        id: String,
    },

    /// Stored data could not be reconstructed into domain types.
    #[error("invalid persisted catalog data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogRepositoryError {
    /// Builds a not-found error for an entry of catalog `T`.
    pub fn not_found<T: CatalogEntry>(id: T::Id) -> Self {
        Self::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        }
    }

    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
