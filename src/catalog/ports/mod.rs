//! Port contracts for the master catalogs.

pub mod repository;

pub use repository::{
    CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult, CatalogStore,
};
