//! Service layer for catalog management.

mod catalog;
mod defaults;

pub use catalog::{
    CatalogService, CatalogServiceError, CatalogServiceResult, ComplianceIssue, SeedReport,
    SeededEntry,
};
