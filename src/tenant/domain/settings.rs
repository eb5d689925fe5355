//! Typed organisation settings parsed from the tenant's settings payload.

use super::TenantSettingsError;
use crate::catalog::domain::RiskLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether assignees must accept each occurrence before it counts as
/// confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Every occurrence starts in `pending_acceptance`.
    #[default]
    Required,
    /// Occurrences start `scheduled`.
    NotRequired,
    /// Only occurrences of high-risk duties need acceptance.
    HighRiskOnly,
}

impl AcceptancePolicy {
    /// Returns whether occurrences of a duty with `risk` need acceptance.
    #[must_use]
    pub const fn requires_acceptance(self, risk: RiskLevel) -> bool {
        match self {
            Self::Required => true,
            Self::NotRequired => false,
            Self::HighRiskOnly => matches!(risk, RiskLevel::High),
        }
    }
}

/// Which duties need an administrator's approval before they go live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    /// Assignments never wait for approval.
    NotRequired,
    /// High-risk duties start in `pending_approval`.
    #[default]
    HighRisk,
    /// Medium and high-risk duties start in `pending_approval`.
    MediumAndHigh,
}

impl ApprovalPolicy {
    /// Returns whether a duty with `risk` needs approval.
    #[must_use]
    pub const fn requires_approval(self, risk: RiskLevel) -> bool {
        match self {
            Self::NotRequired => false,
            Self::HighRisk => matches!(risk, RiskLevel::High),
            Self::MediumAndHigh => matches!(risk, RiskLevel::Medium | RiskLevel::High),
        }
    }
}

/// Whether administrators may force an assignment past detected conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverridePolicy {
    /// Conflicts always reject the assignment.
    Disabled,
    /// Conflicts may be overridden when a reason is recorded.
    #[default]
    EmergencyWithReason,
}

impl OverridePolicy {
    /// Returns whether overrides are permitted.
    #[must_use]
    pub const fn permits_override(self) -> bool {
        matches!(self, Self::EmergencyWithReason)
    }
}

/// Roster policy for one organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrgSettings {
    /// Occurrence acceptance policy.
    pub acceptance: AcceptancePolicy,
    /// Assignment approval policy.
    pub approval: ApprovalPolicy,
    /// Conflict override policy.
    pub conflict_override: OverridePolicy,
    /// Upper bound on the occurrences one assignment may expand into.
    pub max_occurrences_per_assignment: u16,
}

impl OrgSettings {
    /// Default occurrence ceiling, roughly one school year of daily duties.
    pub const DEFAULT_MAX_OCCURRENCES: u16 = 370;

    /// Parses settings from a stored JSON payload. `null` yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TenantSettingsError::Malformed`] when the payload contains
    /// unknown keys or invalid values, and
    /// [`TenantSettingsError::ZeroOccurrenceCeiling`] when the occurrence
    /// ceiling is zero.
    pub fn from_json(value: &Value) -> Result<Self, TenantSettingsError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let parsed = Self::deserialize(value)
            .map_err(|err| TenantSettingsError::Malformed(err.to_string()))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Serializes the settings into the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`TenantSettingsError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<Value, TenantSettingsError> {
        serde_json::to_value(self).map_err(|err| TenantSettingsError::Malformed(err.to_string()))
    }

    /// Returns a copy with a different acceptance policy.
    #[must_use]
    pub const fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Returns a copy with a different approval policy.
    #[must_use]
    pub const fn with_approval(mut self, approval: ApprovalPolicy) -> Self {
        self.approval = approval;
        self
    }

    /// Returns a copy with a different conflict override policy.
    #[must_use]
    pub const fn with_conflict_override(mut self, conflict_override: OverridePolicy) -> Self {
        self.conflict_override = conflict_override;
        self
    }

    const fn validate(&self) -> Result<(), TenantSettingsError> {
        if self.max_occurrences_per_assignment == 0 {
            return Err(TenantSettingsError::ZeroOccurrenceCeiling);
        }
        Ok(())
    }
}

impl Default for OrgSettings {
    fn default() -> Self {
        Self {
            acceptance: AcceptancePolicy::default(),
            approval: ApprovalPolicy::default(),
            conflict_override: OverridePolicy::default(),
            max_occurrences_per_assignment: Self::DEFAULT_MAX_OCCURRENCES,
        }
    }
}
