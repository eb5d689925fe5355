//! In-memory tenant directory for tests and single-tenant embedding.

use crate::tenant::{
    domain::{TenantCode, TenantRecord},
    ports::{TenantDirectory, TenantDirectoryError, TenantDirectoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory tenant directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantDirectory {
    tenants: Arc<RwLock<HashMap<TenantCode, TenantRecord>>>,
}

impl InMemoryTenantDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a tenant record.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDirectoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn insert(&self, record: TenantRecord) -> TenantDirectoryResult<()> {
        let mut tenants = self.tenants.write().map_err(|err| {
            TenantDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        tenants.insert(record.code.clone(), record);
        Ok(())
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn find_by_code(&self, code: &TenantCode) -> TenantDirectoryResult<Option<TenantRecord>> {
        let tenants = self.tenants.read().map_err(|err| {
            TenantDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(tenants.get(code).cloned())
    }
}
