//! Tenant resolution and organisation settings.
//!
//! Every school group is a tenant with its own database and its own roster
//! policy. A [`domain::TenantContext`] is resolved once per request and
//! passed explicitly to every repository call. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
