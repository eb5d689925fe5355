//! Directory port mapping tenant codes to tenant records.

use crate::tenant::domain::{TenantCode, TenantRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tenant directory operations.
pub type TenantDirectoryResult<T> = Result<T, TenantDirectoryError>;

/// Lookup contract for the shared tenant directory.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Finds a tenant by routing code.
    ///
    /// Returns `None` when no tenant has the code.
    async fn find_by_code(&self, code: &TenantCode) -> TenantDirectoryResult<Option<TenantRecord>>;
}

/// Errors returned by tenant directory implementations.
#[derive(Debug, Clone, Error)]
pub enum TenantDirectoryError {
    /// Stored tenant data could not be reconstructed into domain types.
    #[error("invalid persisted tenant data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TenantDirectoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
