//! Duty roster: multi-tenant school duty planning.
//!
//! This crate assigns recurring school duties (gate duty, recess supervision,
//! student leadership roles) to teachers, staff, and students. It checks
//! double-booking and weekly caps, tracks per-occurrence acceptance, and keeps
//! an append-only audit trail of every state change.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration over ports, scoped by a tenant context
//!
//! # Modules
//!
//! - [`tenant`]: Tenant context and typed organisation settings
//! - [`catalog`]: Duty definitions, time slots, locations, and roles
//! - [`roster`]: Assignment engine, acceptance workflow, and reporting
//! - [`schema`]: Embedded migrations and the schema version

pub mod catalog;
pub mod roster;
pub mod schema;
pub mod tenant;

#[cfg(test)]
mod test_support;
