//! `PostgreSQL` adapters for the master catalogs.

mod models;
mod repository;
mod schema;

pub use repository::{CatalogPgPool, PostgresCatalogStore};
