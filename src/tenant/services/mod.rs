//! Application services for tenant resolution.

mod resolver;

pub use resolver::{TenantResolutionError, TenantResolver};
