//! Master catalogs for roster planning.
//!
//! Duty definitions, time slots, locations, and roles are tenant-scoped
//! reference data. They are created and edited rarely, soft-deleted through
//! an `is_active` flag, and looked up by identifier from the assignment
//! engine. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
