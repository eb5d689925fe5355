//! Per-request tenant context and stored tenant records.

use super::{OrgSettings, TenantCode, TenantId};

/// Tenant scope resolved once per request.
///
/// Repositories receive the context on every call and scope all reads and
/// writes to `tenant_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
    code: TenantCode,
    settings: OrgSettings,
}

impl TenantContext {
    /// Creates a tenant context.
    #[must_use]
    pub const fn new(tenant_id: TenantId, code: TenantCode, settings: OrgSettings) -> Self {
        Self {
            tenant_id,
            code,
            settings,
        }
    }

    /// Returns the tenant identifier.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the tenant code.
    #[must_use]
    pub const fn code(&self) -> &TenantCode {
        &self.code
    }

    /// Returns the organisation settings.
    #[must_use]
    pub const fn settings(&self) -> &OrgSettings {
        &self.settings
    }
}

/// Tenant row held in the shared admin database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    /// Tenant identifier.
    pub id: TenantId,
    /// Routing code.
    pub code: TenantCode,
    /// Display name.
    pub name: String,
    /// Connection string of the tenant's dedicated database.
    pub database_url: String,
    /// Parsed organisation settings.
    pub settings: OrgSettings,
    /// Whether the tenant may be served.
    pub is_active: bool,
}

impl TenantRecord {
    /// Builds the per-request context for this tenant.
    #[must_use]
    pub fn context(&self) -> TenantContext {
        TenantContext::new(self.id, self.code.clone(), self.settings)
    }
}
