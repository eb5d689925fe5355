//! Catalog management service: CRUD over the master catalogs, default
//! seeding, and compliance checks.

use super::defaults;
use crate::catalog::{
    domain::{
        CatalogCode, CatalogDomainError, CatalogEntry, CatalogKind, DutyDefinition,
        DutyDefinitionId, Location, Role, TimeSlot,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogStore},
};
use crate::tenant::domain::TenantContext;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),

    /// The requested entry does not exist for the tenant.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Catalog concerned.
        kind: CatalogKind,
        /// Rendered identifier or code.
        id: String,
    },

    /// The code is already used in the catalog.
    #[error("duplicate {kind} code: {code}")]
    DuplicateCode {
        /// Catalog concerned.
        kind: CatalogKind,
        /// Colliding code.
        code: CatalogCode,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(CatalogRepositoryError),
}

impl From<CatalogRepositoryError> for CatalogServiceError {
    fn from(err: CatalogRepositoryError) -> Self {
        match err {
            CatalogRepositoryError::DuplicateCode { kind, code } => {
                Self::DuplicateCode { kind, code }
            }
            CatalogRepositoryError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Repository(other),
        }
    }
}

/// Result type for catalog service operations.
pub type CatalogServiceResult<T> = Result<T, CatalogServiceError>;

/// One entry touched by [`CatalogService::seed_defaults`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededEntry {
    /// Catalog the entry belongs to.
    pub kind: CatalogKind,
    /// Entry code.
    pub code: CatalogCode,
}

/// Outcome of seeding the default catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Entries created by this run.
    pub created: Vec<SeededEntry>,
    /// Entries skipped because the code already existed.
    pub skipped: Vec<SeededEntry>,
}

/// High-risk duty that does not require a supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceIssue {
    /// Offending duty.
    pub duty_id: DutyDefinitionId,
    /// Duty code.
    pub code: CatalogCode,
    /// Human-readable explanation.
    pub message: String,
}

/// Tenant-scoped catalog management service.
#[derive(Clone)]
pub struct CatalogService<S, C>
where
    S: CatalogStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> CatalogService<S, C>
where
    S: CatalogStore,
    C: Clock + Send + Sync,
{
    /// Creates a catalog service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Validates and stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Domain`] for invalid drafts and
    /// [`CatalogServiceError::DuplicateCode`] when the code is taken.
    pub async fn create<T>(&self, ctx: &TenantContext, draft: T::Draft) -> CatalogServiceResult<T>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        let entry = T::create(draft, &*self.clock)?;
        <S as CatalogRepository<T>>::insert(&*self.store, ctx, &entry).await?;
        info!(
            tenant = %ctx.code(),
            kind = %T::KIND,
            code = %entry.entry_code(),
            "catalog entry created"
        );
        Ok(entry)
    }

    /// Replaces the editable fields of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::NotFound`] when the entry does not
    /// exist, [`CatalogServiceError::Domain`] for invalid drafts and
    /// [`CatalogServiceError::DuplicateCode`] when the new code is taken.
    pub async fn update<T>(
        &self,
        ctx: &TenantContext,
        id: T::Id,
        draft: T::Draft,
    ) -> CatalogServiceResult<T>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        let mut entry = self.get::<T>(ctx, id).await?;
        entry.update(draft, &*self.clock)?;
        <S as CatalogRepository<T>>::update(&*self.store, ctx, &entry).await?;
        Ok(entry)
    }

    /// Soft-deletes an entry. Deactivating an inactive entry is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::NotFound`] when the entry does not
    /// exist.
    pub async fn deactivate<T>(&self, ctx: &TenantContext, id: T::Id) -> CatalogServiceResult<T>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        let mut entry = self.get::<T>(ctx, id).await?;
        if !entry.entry_is_active() {
            return Ok(entry);
        }
        entry.retire(&*self.clock);
        <S as CatalogRepository<T>>::update(&*self.store, ctx, &entry).await?;
        info!(tenant = %ctx.code(), kind = %T::KIND, %id, "catalog entry deactivated");
        Ok(entry)
    }

    /// Loads an entry by identifier, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::NotFound`] when the entry does not
    /// exist for the tenant.
    pub async fn get<T>(&self, ctx: &TenantContext, id: T::Id) -> CatalogServiceResult<T>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        <S as CatalogRepository<T>>::find_by_id(&*self.store, ctx, id)
            .await?
            .ok_or_else(|| CatalogServiceError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })
    }

    /// Looks an entry up by code.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Domain`] for malformed codes and
    /// [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn find_by_code<T>(
        &self,
        ctx: &TenantContext,
        code: &str,
    ) -> CatalogServiceResult<Option<T>>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        let parsed = CatalogCode::new(code)?;
        Ok(<S as CatalogRepository<T>>::find_by_code(&*self.store, ctx, &parsed).await?)
    }

    /// Lists entries ordered by code.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn list<T>(
        &self,
        ctx: &TenantContext,
        include_inactive: bool,
    ) -> CatalogServiceResult<Vec<T>>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        Ok(<S as CatalogRepository<T>>::list(&*self.store, ctx, include_inactive).await?)
    }

    /// Installs the default catalog, skipping codes that already exist.
    ///
    /// Running it twice creates nothing the second time.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError`] when validation or persistence fails.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.code()))]
    pub async fn seed_defaults(&self, ctx: &TenantContext) -> CatalogServiceResult<SeedReport> {
        let mut report = SeedReport::default();

        for draft in defaults::time_slots() {
            let code = draft.code.clone();
            self.seed_entry::<TimeSlot>(ctx, &code, draft, &mut report)
                .await?;
        }
        for draft in defaults::locations() {
            let code = draft.code.clone();
            self.seed_entry::<Location>(ctx, &code, draft, &mut report)
                .await?;
        }
        for draft in defaults::roles() {
            let code = draft.code.clone();
            self.seed_entry::<Role>(ctx, &code, draft, &mut report).await?;
        }
        for duty in defaults::duties() {
            let slot = self.require_code::<TimeSlot>(ctx, duty.slot_code).await?;
            let location = self
                .require_code::<Location>(ctx, duty.location_code)
                .await?;
            let code = duty.draft.code.clone();
            let draft = duty
                .draft
                .with_default_time_slot(slot.id())
                .with_default_location(location.id());
            self.seed_entry::<DutyDefinition>(ctx, &code, draft, &mut report)
                .await?;
        }

        info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            "default catalog seeded"
        );
        Ok(report)
    }

    /// Lists active high-risk duties that do not require a supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when the lookup fails.
    pub async fn duty_compliance_issues(
        &self,
        ctx: &TenantContext,
    ) -> CatalogServiceResult<Vec<ComplianceIssue>> {
        let duties = self.list::<DutyDefinition>(ctx, false).await?;
        Ok(duties
            .into_iter()
            .filter(DutyDefinition::lacks_required_supervision)
            .map(|duty| ComplianceIssue {
                duty_id: duty.id(),
                code: duty.code().clone(),
                message: format!(
                    "high-risk duty '{}' does not require a supervisor",
                    duty.name()
                ),
            })
            .collect())
    }

    async fn seed_entry<T>(
        &self,
        ctx: &TenantContext,
        code: &str,
        draft: T::Draft,
        report: &mut SeedReport,
    ) -> CatalogServiceResult<()>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        let parsed = CatalogCode::new(code)?;
        let seeded = SeededEntry {
            kind: T::KIND,
            code: parsed.clone(),
        };
        if <S as CatalogRepository<T>>::find_by_code(&*self.store, ctx, &parsed)
            .await?
            .is_some()
        {
            debug!(kind = %T::KIND, code = %parsed, "default entry exists, skipping");
            report.skipped.push(seeded);
            return Ok(());
        }
        self.create::<T>(ctx, draft).await?;
        report.created.push(seeded);
        Ok(())
    }

    async fn require_code<T>(&self, ctx: &TenantContext, code: &str) -> CatalogServiceResult<T>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        self.find_by_code::<T>(ctx, code)
            .await?
            .ok_or_else(|| CatalogServiceError::NotFound {
                kind: T::KIND,
                id: code.to_owned(),
            })
    }
}
