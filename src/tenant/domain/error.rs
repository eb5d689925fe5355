//! Error types for tenant validation and settings parsing.

use thiserror::Error;

/// Errors returned while constructing tenant domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantDomainError {
    /// The tenant code is empty after trimming.
    #[error("tenant code must not be empty")]
    EmptyTenantCode,

    /// The tenant code contains characters outside `[a-z0-9_-]` or is too
    /// long.
    #[error("invalid tenant code '{0}', expected 1-64 characters of [a-z0-9_-]")]
    InvalidTenantCode(String),
}

/// Errors returned while parsing organisation settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantSettingsError {
    /// The settings payload does not match the known shape.
    #[error("malformed organisation settings: {0}")]
    Malformed(String),

    /// The occurrence ceiling must allow at least one occurrence.
    #[error("max_occurrences_per_assignment must be at least 1")]
    ZeroOccurrenceCeiling,
}
