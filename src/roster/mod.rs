//! Roster planning: the assignment engine, the acceptance workflow, and
//! read-only reporting.
//!
//! Assignments are created against the master catalogs in
//! [`crate::catalog`], checked for double-booking and weekly caps, and then
//! progressed occurrence by occurrence. The module follows hexagonal
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

#[cfg(test)]
mod tests;
