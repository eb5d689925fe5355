//! `PostgreSQL` adapter for the shared tenant directory.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTenantDirectory, TenantPgPool};
