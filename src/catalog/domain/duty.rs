//! Duty definitions: templates that roster assignments instantiate.

use super::{
    AssigneeKind, AssigneeKindSet, CatalogCode, CatalogDomainError, DutyDefinitionId, LocationId,
    ParseCatalogValueError, TimeSlotId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Broad grouping of duties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyCategory {
    /// Teaching-related duties such as cover lessons.
    Academic,
    /// Site operations such as gate or corridor duty.
    Operational,
    /// Prefect and monitor roles held by students.
    StudentLeadership,
    /// School events and assemblies.
    Event,
    /// Bus and pick-up supervision.
    Transport,
    /// Examination invigilation.
    Exam,
}

impl DutyCategory {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Operational => "operational",
            Self::StudentLeadership => "student_leadership",
            Self::Event => "event",
            Self::Transport => "transport",
            Self::Exam => "exam",
        }
    }
}

impl TryFrom<&str> for DutyCategory {
    type Error = ParseCatalogValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "academic" => Ok(Self::Academic),
            "operational" => Ok(Self::Operational),
            "student_leadership" => Ok(Self::StudentLeadership),
            "event" => Ok(Self::Event),
            "transport" => Ok(Self::Transport),
            "exam" => Ok(Self::Exam),
            _ => Err(ParseCatalogValueError::new("duty category", value)),
        }
    }
}

/// Risk level of a duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Routine supervision.
    Low,
    /// Needs some experience or briefing.
    Medium,
    /// Safety-critical; normally supervised and approved.
    High,
}

impl RiskLevel {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for RiskLevel {
    type Error = ParseCatalogValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseCatalogValueError::new("risk level", value)),
        }
    }
}

/// Optional lower and upper bounds on simultaneous assignees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssigneeBounds {
    min: Option<u16>,
    max: Option<u16>,
}

impl AssigneeBounds {
    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::ZeroMaxAssignees`] for a zero maximum
    /// and [`CatalogDomainError::InvalidAssigneeBounds`] when `min > max`.
    pub const fn new(min: Option<u16>, max: Option<u16>) -> Result<Self, CatalogDomainError> {
        if let Some(upper) = max {
            if upper == 0 {
                return Err(CatalogDomainError::ZeroMaxAssignees);
            }
            if let Some(lower) = min
                && lower > upper
            {
                return Err(CatalogDomainError::InvalidAssigneeBounds {
                    min: lower,
                    max: upper,
                });
            }
        }
        Ok(Self { min, max })
    }

    /// Returns the minimum, if any.
    #[must_use]
    pub const fn min(self) -> Option<u16> {
        self.min
    }

    /// Returns the maximum, if any.
    #[must_use]
    pub const fn max(self) -> Option<u16> {
        self.max
    }

    /// Returns whether `count` satisfies both bounds.
    #[must_use]
    pub fn admits(self, count: usize) -> bool {
        let above_min = self.min.is_none_or(|lower| count >= usize::from(lower));
        let below_max = self.max.is_none_or(|upper| count <= usize::from(upper));
        above_min && below_max
    }
}

/// Unvalidated duty definition fields supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyDefinitionDraft {
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Duty category.
    pub category: DutyCategory,
    /// Kinds of assignee allowed.
    pub allowed_assignees: Vec<AssigneeKind>,
    /// Risk level.
    pub risk_level: RiskLevel,
    /// Whether every assignment must name a supervisor.
    pub supervisor_required: bool,
    /// Slot used when an assignment does not pick one.
    pub default_time_slot: Option<TimeSlotId>,
    /// Location used when an assignment does not pick one.
    pub default_location: Option<LocationId>,
    /// Minimum simultaneous assignees.
    pub min_assignees: Option<u16>,
    /// Maximum simultaneous assignees.
    pub max_assignees: Option<u16>,
    /// Maximum duties per ISO week for a student.
    pub student_weekly_cap: Option<u16>,
}

impl DutyDefinitionDraft {
    /// Creates a draft with the required fields and permissive defaults.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: DutyCategory,
        allowed_assignees: impl IntoIterator<Item = AssigneeKind>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            category,
            allowed_assignees: allowed_assignees.into_iter().collect(),
            risk_level: RiskLevel::Low,
            supervisor_required: false,
            default_time_slot: None,
            default_location: None,
            min_assignees: None,
            max_assignees: None,
            student_weekly_cap: None,
        }
    }

    /// Sets the risk level.
    #[must_use]
    pub const fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Marks the duty as needing a named supervisor.
    #[must_use]
    pub const fn with_supervisor_required(mut self) -> Self {
        self.supervisor_required = true;
        self
    }

    /// Sets the default time slot.
    #[must_use]
    pub const fn with_default_time_slot(mut self, slot: TimeSlotId) -> Self {
        self.default_time_slot = Some(slot);
        self
    }

    /// Sets the default location.
    #[must_use]
    pub const fn with_default_location(mut self, location: LocationId) -> Self {
        self.default_location = Some(location);
        self
    }

    /// Sets simultaneous assignee bounds.
    #[must_use]
    pub const fn with_assignee_bounds(mut self, min: Option<u16>, max: Option<u16>) -> Self {
        self.min_assignees = min;
        self.max_assignees = max;
        self
    }

    /// Sets the weekly cap for student assignees.
    #[must_use]
    pub const fn with_student_weekly_cap(mut self, cap: u16) -> Self {
        self.student_weekly_cap = Some(cap);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Validated duty definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyDefinition {
    id: DutyDefinitionId,
    code: CatalogCode,
    name: String,
    description: Option<String>,
    category: DutyCategory,
    allowed_assignees: AssigneeKindSet,
    risk_level: RiskLevel,
    supervisor_required: bool,
    default_time_slot: Option<TimeSlotId>,
    default_location: Option<LocationId>,
    bounds: AssigneeBounds,
    student_weekly_cap: Option<u16>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted duty definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDutyDefinition {
    /// Persisted identifier.
    pub id: DutyDefinitionId,
    /// Persisted code.
    pub code: CatalogCode,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted category.
    pub category: DutyCategory,
    /// Persisted allowed kinds.
    pub allowed_assignees: AssigneeKindSet,
    /// Persisted risk level.
    pub risk_level: RiskLevel,
    /// Persisted supervisor flag.
    pub supervisor_required: bool,
    /// Persisted default slot.
    pub default_time_slot: Option<TimeSlotId>,
    /// Persisted default location.
    pub default_location: Option<LocationId>,
    /// Persisted assignee bounds.
    pub bounds: AssigneeBounds,
    /// Persisted student weekly cap.
    pub student_weekly_cap: Option<u16>,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

struct ValidatedDutyFields {
    code: CatalogCode,
    name: String,
    allowed_assignees: AssigneeKindSet,
    bounds: AssigneeBounds,
}

fn validate_draft(draft: &DutyDefinitionDraft) -> Result<ValidatedDutyFields, CatalogDomainError> {
    let code = CatalogCode::new(draft.code.as_str())?;
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(CatalogDomainError::EmptyName);
    }
    let allowed_assignees = AssigneeKindSet::new(draft.allowed_assignees.iter().copied())?;
    let bounds = AssigneeBounds::new(draft.min_assignees, draft.max_assignees)?;
    if let Some(cap) = draft.student_weekly_cap {
        if !allowed_assignees.allows(AssigneeKind::Student) {
            return Err(CatalogDomainError::WeeklyCapWithoutStudents);
        }
        if cap == 0 {
            return Err(CatalogDomainError::ZeroWeeklyCap);
        }
    }
    Ok(ValidatedDutyFields {
        code,
        name: name.to_owned(),
        allowed_assignees,
        bounds,
    })
}

impl DutyDefinition {
    /// Validates a draft and creates an active duty definition.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when any field fails validation.
    pub fn new(draft: DutyDefinitionDraft, clock: &impl Clock) -> Result<Self, CatalogDomainError> {
        let fields = validate_draft(&draft)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: DutyDefinitionId::new(),
            code: fields.code,
            name: fields.name,
            description: draft.description,
            category: draft.category,
            allowed_assignees: fields.allowed_assignees,
            risk_level: draft.risk_level,
            supervisor_required: draft.supervisor_required,
            default_time_slot: draft.default_time_slot,
            default_location: draft.default_location,
            bounds: fields.bounds,
            student_weekly_cap: draft.student_weekly_cap,
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a duty definition from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedDutyDefinition) -> Self {
        Self {
            id: data.id,
            code: data.code,
            name: data.name,
            description: data.description,
            category: data.category,
            allowed_assignees: data.allowed_assignees,
            risk_level: data.risk_level,
            supervisor_required: data.supervisor_required,
            default_time_slot: data.default_time_slot,
            default_location: data.default_location,
            bounds: data.bounds,
            student_weekly_cap: data.student_weekly_cap,
            is_active: data.is_active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Replaces the editable fields with a validated draft. The identifier,
    /// active flag, and creation time are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when any field fails validation.
    pub fn apply(
        &mut self,
        draft: DutyDefinitionDraft,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        let fields = validate_draft(&draft)?;
        self.code = fields.code;
        self.name = fields.name;
        self.description = draft.description;
        self.category = draft.category;
        self.allowed_assignees = fields.allowed_assignees;
        self.risk_level = draft.risk_level;
        self.supervisor_required = draft.supervisor_required;
        self.default_time_slot = draft.default_time_slot;
        self.default_location = draft.default_location;
        self.bounds = fields.bounds;
        self.student_weekly_cap = draft.student_weekly_cap;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Soft-deletes the definition.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.updated_at = clock.utc();
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> DutyDefinitionId {
        self.id
    }

    /// Returns the code.
    #[must_use]
    pub const fn code(&self) -> &CatalogCode {
        &self.code
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> DutyCategory {
        self.category
    }

    /// Returns the allowed assignee kinds.
    #[must_use]
    pub const fn allowed_assignees(&self) -> &AssigneeKindSet {
        &self.allowed_assignees
    }

    /// Returns the risk level.
    #[must_use]
    pub const fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Returns whether assignments need a named supervisor.
    #[must_use]
    pub const fn supervisor_required(&self) -> bool {
        self.supervisor_required
    }

    /// Returns the default time slot.
    #[must_use]
    pub const fn default_time_slot(&self) -> Option<TimeSlotId> {
        self.default_time_slot
    }

    /// Returns the default location.
    #[must_use]
    pub const fn default_location(&self) -> Option<LocationId> {
        self.default_location
    }

    /// Returns the simultaneous assignee bounds.
    #[must_use]
    pub const fn bounds(&self) -> AssigneeBounds {
        self.bounds
    }

    /// Returns the weekly cap for students.
    #[must_use]
    pub const fn student_weekly_cap(&self) -> Option<u16> {
        self.student_weekly_cap
    }

    /// Returns whether the definition is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether a high-risk duty is missing its supervisor
    /// requirement. Storage does not forbid this; reports surface it.
    #[must_use]
    pub const fn lacks_required_supervision(&self) -> bool {
        matches!(self.risk_level, RiskLevel::High) && !self.supervisor_required
    }
}
