//! Port contracts for tenant resolution.

pub mod directory;

pub use directory::{TenantDirectory, TenantDirectoryError, TenantDirectoryResult};
