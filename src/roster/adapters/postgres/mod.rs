//! `PostgreSQL` adapter for roster assignments, occurrences and audit.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresRosterRepository, RosterPgPool};
