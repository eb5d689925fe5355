//! Resolves a per-request [`TenantContext`] from a tenant code.

use crate::tenant::{
    domain::{TenantCode, TenantContext, TenantDomainError, TenantRecord},
    ports::{TenantDirectory, TenantDirectoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while resolving a tenant.
#[derive(Debug, Error)]
pub enum TenantResolutionError {
    /// The supplied code is malformed.
    #[error(transparent)]
    Domain(#[from] TenantDomainError),
    /// No active tenant uses the code.
    #[error("tenant '{0}' not found")]
    NotFound(TenantCode),
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] TenantDirectoryError),
}

/// Tenant lookup service used at the start of every request.
#[derive(Clone)]
pub struct TenantResolver<D>
where
    D: TenantDirectory,
{
    directory: Arc<D>,
}

impl<D> TenantResolver<D>
where
    D: TenantDirectory,
{
    /// Creates a resolver over the given directory.
    #[must_use]
    pub const fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Resolves the full tenant record, rejecting unknown or inactive tenants.
    ///
    /// # Errors
    ///
    /// Returns [`TenantResolutionError::NotFound`] for unknown or inactive
    /// tenants, and domain or directory errors otherwise.
    pub async fn resolve_record(&self, code: &str) -> Result<TenantRecord, TenantResolutionError> {
        let tenant_code = TenantCode::new(code)?;
        match self.directory.find_by_code(&tenant_code).await? {
            Some(record) if record.is_active => Ok(record),
            Some(_) | None => {
                tracing::warn!(tenant = %tenant_code, "tenant lookup rejected");
                Err(TenantResolutionError::NotFound(tenant_code))
            }
        }
    }

    /// Resolves the request-scoped tenant context.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_record`].
    pub async fn resolve_context(
        &self,
        code: &str,
    ) -> Result<TenantContext, TenantResolutionError> {
        Ok(self.resolve_record(code).await?.context())
    }
}
