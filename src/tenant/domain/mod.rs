//! Domain model for tenants and their roster policy.

mod context;
mod error;
mod ids;
mod settings;

pub use context::{TenantContext, TenantRecord};
pub use error::{TenantDomainError, TenantSettingsError};
pub use ids::{TenantCode, TenantId};
pub use settings::{AcceptancePolicy, ApprovalPolicy, OrgSettings, OverridePolicy};
