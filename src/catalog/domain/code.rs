//! Tenant-unique catalog codes.

use super::CatalogDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized catalog code, unique per tenant and catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogCode(String);

impl CatalogCode {
    const MAX_LENGTH: usize = 50;

    /// Creates a validated code. Input is trimmed and uppercased.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyCode`] for blank input and
    /// [`CatalogDomainError::InvalidCode`] for codes that are too long or
    /// contain characters outside `[A-Z0-9_-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(CatalogDomainError::EmptyCode);
        }
        let is_valid = normalized.len() <= Self::MAX_LENGTH
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_' || ch == '-');
        if !is_valid {
            return Err(CatalogDomainError::InvalidCode(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CatalogCode {
    type Error = CatalogDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CatalogCode> for String {
    fn from(code: CatalogCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CatalogCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CatalogCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
