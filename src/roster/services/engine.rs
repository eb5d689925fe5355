//! Assignment engine: conflict previews, assignment creation with
//! validation, approval and cancellation.

use super::error::{
    InvalidStateError, NotFoundError, RosterServiceError, RosterServiceResult, ValidationError,
};
use crate::catalog::{
    domain::{
        CatalogEntry, DutyDefinition, DutyDefinitionId, Location, Role, RoleId, TimeSlot,
        TimeWindow,
    },
    ports::{CatalogRepository, CatalogStore},
};
use crate::roster::{
    domain::{
        ActorId, AssigneeId, AssigneeRef, AssignmentId, AssignmentOccurrence, AssignmentStatus,
        AuditAction, AuditLogEntry, AuditSnapshot, ConflictReport, LocationSelection,
        NewAssignment, OccurrenceStatus, Recurrence, RosterAssignment, RosterDomainError,
        SlotSelection,
    },
    ports::{
        AssignmentBatch, AssignmentDetails, BookingGuard, OccurrenceChange, RosterRepository,
        RosterRepositoryError, StateChange,
    },
};
use crate::tenant::domain::TenantContext;
use chrono::{Datelike, NaiveDate};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Read-only conflict preview request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictQuery {
    duty_id: DutyDefinitionId,
    assignees: Vec<AssigneeRef>,
    recurrence: Recurrence,
    slot: Option<SlotSelection>,
}

impl ConflictQuery {
    /// Creates a query that uses the duty's default time slot.
    #[must_use]
    pub fn new(
        duty_id: DutyDefinitionId,
        assignees: impl IntoIterator<Item = AssigneeRef>,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            duty_id,
            assignees: assignees.into_iter().collect(),
            recurrence,
            slot: None,
        }
    }

    /// Checks against an explicit slot instead of the duty default.
    #[must_use]
    pub const fn with_slot(mut self, slot: SlotSelection) -> Self {
        self.slot = Some(slot);
        self
    }
}

/// Explicit request to book past detected conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictOverride {
    reason: String,
}

impl ConflictOverride {
    /// Creates an override with a mandatory reason.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::EmptyOverrideReason`] for a blank reason.
    pub fn new(reason: impl Into<String>) -> Result<Self, RosterDomainError> {
        let raw = reason.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RosterDomainError::EmptyOverrideReason);
        }
        Ok(Self {
            reason: trimmed.to_owned(),
        })
    }

    /// Returns the recorded reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Request to assign a duty to one or more people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAssignmentRequest {
    duty_id: DutyDefinitionId,
    assignees: Vec<AssigneeRef>,
    recurrence: Recurrence,
    slot: Option<SlotSelection>,
    location: Option<LocationSelection>,
    supervisor_id: Option<AssigneeId>,
    role_id: Option<RoleId>,
    notes: Option<String>,
    conflict_override: Option<ConflictOverride>,
    actor: ActorId,
}

impl CreateAssignmentRequest {
    /// Creates a request using the duty's default slot and location.
    #[must_use]
    pub fn new(
        duty_id: DutyDefinitionId,
        assignees: impl IntoIterator<Item = AssigneeRef>,
        recurrence: Recurrence,
        actor: ActorId,
    ) -> Self {
        Self {
            duty_id,
            assignees: assignees.into_iter().collect(),
            recurrence,
            slot: None,
            location: None,
            supervisor_id: None,
            role_id: None,
            notes: None,
            conflict_override: None,
            actor,
        }
    }

    /// Uses an explicit slot.
    #[must_use]
    pub const fn with_slot(mut self, slot: SlotSelection) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Uses an explicit location.
    #[must_use]
    pub fn with_location(mut self, location: LocationSelection) -> Self {
        self.location = Some(location);
        self
    }

    /// Names the supervising staff member.
    #[must_use]
    pub fn with_supervisor(mut self, supervisor_id: AssigneeId) -> Self {
        self.supervisor_id = Some(supervisor_id);
        self
    }

    /// Sets the role held on the duty.
    #[must_use]
    pub const fn with_role(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }

    /// Attaches free-text notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Books past conflicts, if the organisation permits it.
    #[must_use]
    pub fn with_override(mut self, conflict_override: ConflictOverride) -> Self {
        self.conflict_override = Some(conflict_override);
        self
    }
}

struct ResolvedSlot {
    window: TimeWindow,
    catalog: Option<TimeSlot>,
}

struct Plan {
    duty: DutyDefinition,
    slot: ResolvedSlot,
    location: Option<LocationSelection>,
    dates: Vec<NaiveDate>,
}

/// Creates, approves, and cancels roster assignments.
#[derive(Clone)]
pub struct AssignmentEngine<R, S, C>
where
    R: RosterRepository,
    S: CatalogStore,
    C: Clock + Send + Sync,
{
    roster: Arc<R>,
    catalog: Arc<S>,
    clock: Arc<C>,
}

impl<R, S, C> AssignmentEngine<R, S, C>
where
    R: RosterRepository,
    S: CatalogStore,
    C: Clock + Send + Sync,
{
    /// Creates an engine over the roster repository and catalog store.
    #[must_use]
    pub const fn new(roster: Arc<R>, catalog: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            roster,
            catalog,
            clock,
        }
    }

    /// Reports, per assignee and date, whether the proposed window is free.
    ///
    /// Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::NotFound`] for unknown duties or slots
    /// and [`RosterServiceError::Validation`] for malformed recurrences.
    #[tracing::instrument(
        skip(self, ctx, query),
        fields(tenant = %ctx.code(), duty = %query.duty_id)
    )]
    pub async fn check_conflicts(
        &self,
        ctx: &TenantContext,
        query: ConflictQuery,
    ) -> RosterServiceResult<ConflictReport> {
        let duty = self.find::<DutyDefinition>(ctx, query.duty_id).await?;
        let slot = self.resolve_slot(ctx, &duty, query.slot, false).await?;
        let dates = query
            .recurrence
            .expand(ctx.settings().max_occurrences_per_assignment)?;
        let report = self
            .preview(ctx, slot.window, &query.assignees, &dates)
            .await?;
        debug!(
            dates = dates.len(),
            conflicts = report.conflicts().count(),
            "conflict preview computed"
        );
        Ok(report)
    }

    /// Validates the request and creates one assignment per assignee.
    ///
    /// All assignments, their occurrences and audit entries are committed
    /// together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::NotFound`] for unknown catalog entries,
    /// [`RosterServiceError::Validation`] for rejected input,
    /// [`RosterServiceError::CapacityExceeded`] when a student would pass the
    /// weekly cap, and [`RosterServiceError::Conflict`] when bookings overlap
    /// and no permitted override was given.
    #[tracing::instrument(
        skip(self, ctx, request),
        fields(tenant = %ctx.code(), duty = %request.duty_id, actor = %request.actor)
    )]
    pub async fn create_assignment(
        &self,
        ctx: &TenantContext,
        request: CreateAssignmentRequest,
    ) -> RosterServiceResult<Vec<AssignmentDetails>> {
        let plan = self.plan(ctx, &request).await?;
        let mut guard = BookingGuard {
            window: plan.slot.window,
            dates: plan.dates.clone(),
            enforce_conflicts: true,
            student_weekly_cap: plan.duty.student_weekly_cap(),
        };
        let override_reason = self.screen(ctx, &request, &mut guard).await?;
        let (assignments, audit) = self.build(ctx, &request, &plan, override_reason.as_deref());

        let batch = AssignmentBatch {
            assignments: assignments.clone(),
            audit,
            guard,
        };
        match self.roster.create_assignments(ctx, batch).await {
            Ok(()) => {}
            Err(RosterRepositoryError::DuplicateBooking) => {
                warn!("concurrent booking won the slot");
                let report = self
                    .preview(ctx, plan.slot.window, &request.assignees, &plan.dates)
                    .await?;
                return Err(RosterServiceError::Conflict(report));
            }
            Err(other) => return Err(other.into()),
        }

        info!(
            assignments = assignments.len(),
            occurrences = plan.dates.len(),
            overridden = override_reason.is_some(),
            "assignments created"
        );
        Ok(assignments)
    }

    /// Resolves catalog references and validates everything that does not
    /// depend on existing bookings.
    async fn plan(
        &self,
        ctx: &TenantContext,
        request: &CreateAssignmentRequest,
    ) -> RosterServiceResult<Plan> {
        let settings = ctx.settings();
        let duty = self.lookup::<DutyDefinition>(ctx, request.duty_id).await?;
        let slot = self.resolve_slot(ctx, &duty, request.slot, true).await?;
        let location = request.location.clone().or_else(|| {
            duty.default_location()
                .map(|location_id| LocationSelection::Catalog { location_id })
        });
        if let Some(location_id) = location.as_ref().and_then(LocationSelection::location_id) {
            self.lookup::<Location>(ctx, location_id).await?;
        }
        if let Some(role_id) = request.role_id {
            self.lookup::<Role>(ctx, role_id).await?;
        }

        validate_assignees(&duty, &request.assignees)?;
        if duty.supervisor_required() && request.supervisor_id.is_none() {
            return Err(ValidationError::SupervisorRequired {
                duty: duty.code().clone(),
            }
            .into());
        }

        let dates = request
            .recurrence
            .expand(settings.max_occurrences_per_assignment)?;
        if let Some(catalog_slot) = &slot.catalog {
            ensure_slot_applies(catalog_slot, &dates)?;
        }
        if request.conflict_override.is_some() && !settings.conflict_override.permits_override() {
            return Err(ValidationError::OverrideNotPermitted.into());
        }
        Ok(Plan {
            duty,
            slot,
            location,
            dates,
        })
    }

    /// Runs the weekly cap and conflict checks against current bookings.
    ///
    /// Returns the override reason when conflicts were found and forced; the
    /// guard then stops enforcing conflicts for the insert.
    async fn screen(
        &self,
        ctx: &TenantContext,
        request: &CreateAssignmentRequest,
        guard: &mut BookingGuard,
    ) -> RosterServiceResult<Option<String>> {
        let Some((from, to)) = guard.lookup_range() else {
            return Ok(None);
        };
        let bookings = self
            .roster
            .find_bookings(ctx, &request.assignees, from, to)
            .await?;
        guard.enforce_conflicts = false;
        guard.evaluate(&request.assignees, &bookings)?;

        let report =
            ConflictReport::build(guard.window, &request.assignees, &guard.dates, &bookings);
        if !report.has_conflicts() {
            guard.enforce_conflicts = true;
            return Ok(None);
        }
        let conflicts = report.conflicts().count();
        let Some(forced) = &request.conflict_override else {
            warn!(conflicts, "assignment rejected on conflicts");
            return Err(RosterServiceError::Conflict(report));
        };
        warn!(conflicts, reason = forced.reason(), "conflicts overridden");
        Ok(Some(forced.reason.clone()))
    }

    /// Materialises assignments, occurrences and audit entries.
    fn build(
        &self,
        ctx: &TenantContext,
        request: &CreateAssignmentRequest,
        plan: &Plan,
        override_reason: Option<&str>,
    ) -> (Vec<AssignmentDetails>, Vec<AuditLogEntry>) {
        let settings = ctx.settings();
        let risk = plan.duty.risk_level();
        let acceptance_required = settings.acceptance.requires_acceptance(risk);
        let status = if settings.approval.requires_approval(risk) {
            AssignmentStatus::PendingApproval
        } else if acceptance_required {
            AssignmentStatus::PendingAcceptance
        } else {
            AssignmentStatus::Scheduled
        };
        let occurrence_status = if acceptance_required {
            OccurrenceStatus::PendingAcceptance
        } else {
            OccurrenceStatus::Scheduled
        };

        let mut assignments = Vec::with_capacity(request.assignees.len());
        let mut audit = Vec::new();
        for assignee in &request.assignees {
            let assignment = RosterAssignment::new(
                NewAssignment {
                    duty_id: plan.duty.id(),
                    recurrence: request.recurrence,
                    time_slot_id: plan.slot.catalog.as_ref().map(TimeSlot::id),
                    window: plan.slot.window,
                    location: plan.location.clone(),
                    assignee: assignee.clone(),
                    supervisor_id: request.supervisor_id.clone(),
                    role_id: request.role_id,
                    status,
                    acceptance_required,
                    override_reason: override_reason.map(str::to_owned),
                    notes: request.notes.clone(),
                    created_by: request.actor.clone(),
                },
                &*self.clock,
            );
            let occurrences = plan
                .dates
                .iter()
                .map(|date| {
                    AssignmentOccurrence::new(&assignment, *date, occurrence_status, &*self.clock)
                })
                .collect();
            audit.push(
                AuditLogEntry::new(
                    assignment.id(),
                    AuditAction::Created,
                    request.actor.clone(),
                    &*self.clock,
                )
                .with_change(None, AuditSnapshot::Assignment { status }),
            );
            if let Some(reason) = override_reason {
                audit.push(
                    AuditLogEntry::new(
                        assignment.id(),
                        AuditAction::ConflictOverridden,
                        request.actor.clone(),
                        &*self.clock,
                    )
                    .with_reason(Some(reason.to_owned())),
                );
            }
            assignments.push(AssignmentDetails {
                assignment,
                occurrences,
            });
        }
        (assignments, audit)
    }

    /// Approves an assignment that is waiting for approval.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::NotFound`] for unknown assignments and
    /// [`RosterServiceError::InvalidState`] unless the assignment is pending
    /// approval.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.code()))]
    pub async fn approve_assignment(
        &self,
        ctx: &TenantContext,
        assignment_id: AssignmentId,
        actor: ActorId,
    ) -> RosterServiceResult<AssignmentDetails> {
        let mut details = self.get_assignment(ctx, assignment_id).await?;
        let before = details.assignment.status();
        if before != AssignmentStatus::PendingApproval {
            return Err(InvalidStateError::NotAwaitingApproval {
                id: assignment_id,
                status: before,
            }
            .into());
        }
        let next = details.assignment.status_after_approval();
        details.assignment.transition_to(next, &*self.clock)?;

        let entry = AuditLogEntry::new(assignment_id, AuditAction::Approved, actor, &*self.clock)
            .with_change(
                Some(AuditSnapshot::Assignment { status: before }),
                AuditSnapshot::Assignment { status: next },
            );
        self.roster
            .apply_change(ctx, StateChange {
                assignment: details.assignment.clone(),
                expected: before,
                occurrences: Vec::new(),
                siblings: Vec::new(),
                audit: vec![entry],
            })
            .await?;
        info!(%assignment_id, status = %next, "assignment approved");
        Ok(details)
    }

    /// Cancels an assignment and every live occurrence.
    ///
    /// Rows are kept; a second cancellation fails without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::NotFound`] for unknown assignments and
    /// [`RosterServiceError::InvalidState`] when the assignment is already
    /// completed or cancelled, or when an occurrence was completed.
    #[tracing::instrument(skip(self, ctx, reason), fields(tenant = %ctx.code()))]
    pub async fn cancel_assignment(
        &self,
        ctx: &TenantContext,
        assignment_id: AssignmentId,
        reason: Option<String>,
        actor: ActorId,
    ) -> RosterServiceResult<AssignmentDetails> {
        let mut details = self.get_assignment(ctx, assignment_id).await?;
        let before = details.assignment.status();
        details
            .assignment
            .transition_to(AssignmentStatus::Cancelled, &*self.clock)?;
        if details
            .occurrences
            .iter()
            .any(|occurrence| occurrence.status() == OccurrenceStatus::Completed)
        {
            return Err(InvalidStateError::HasCompletedOccurrences(assignment_id).into());
        }

        let mut changes = Vec::new();
        for occurrence in &mut details.occurrences {
            let expected = occurrence.status();
            if expected.is_live() {
                occurrence.cancel(&*self.clock)?;
                changes.push(OccurrenceChange {
                    occurrence: occurrence.clone(),
                    expected,
                });
            }
        }

        let entry = AuditLogEntry::new(assignment_id, AuditAction::Cancelled, actor, &*self.clock)
            .with_change(
                Some(AuditSnapshot::Assignment { status: before }),
                AuditSnapshot::Assignment {
                    status: AssignmentStatus::Cancelled,
                },
            )
            .with_reason(reason.filter(|text| !text.trim().is_empty()));
        let cancelled = changes.len();
        self.roster
            .apply_change(ctx, StateChange {
                assignment: details.assignment.clone(),
                expected: before,
                occurrences: changes,
                siblings: Vec::new(),
                audit: vec![entry],
            })
            .await?;
        info!(%assignment_id, occurrences = cancelled, "assignment cancelled");
        Ok(details)
    }

    /// Loads an assignment with its occurrences.
    ///
    /// # Errors
    ///
    /// Returns [`RosterServiceError::NotFound`] when the assignment does not
    /// exist for the tenant.
    pub async fn get_assignment(
        &self,
        ctx: &TenantContext,
        assignment_id: AssignmentId,
    ) -> RosterServiceResult<AssignmentDetails> {
        self.roster
            .find_assignment(ctx, assignment_id)
            .await?
            .ok_or_else(|| NotFoundError::Assignment(assignment_id).into())
    }

    async fn preview(
        &self,
        ctx: &TenantContext,
        window: TimeWindow,
        assignees: &[AssigneeRef],
        dates: &[NaiveDate],
    ) -> RosterServiceResult<ConflictReport> {
        let bookings = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) if !assignees.is_empty() => {
                self.roster.find_bookings(ctx, assignees, *first, *last).await?
            }
            _ => Vec::new(),
        };
        Ok(ConflictReport::build(window, assignees, dates, &bookings))
    }

    async fn resolve_slot(
        &self,
        ctx: &TenantContext,
        duty: &DutyDefinition,
        selection: Option<SlotSelection>,
        require_active: bool,
    ) -> RosterServiceResult<ResolvedSlot> {
        let chosen = selection
            .or_else(|| {
                duty.default_time_slot()
                    .map(|time_slot_id| SlotSelection::Catalog { time_slot_id })
            })
            .ok_or_else(|| ValidationError::MissingTimeSlot {
                duty: duty.code().clone(),
            })?;
        match chosen {
            SlotSelection::Custom { window } => Ok(ResolvedSlot {
                window,
                catalog: None,
            }),
            SlotSelection::Catalog { time_slot_id } => {
                let slot = if require_active {
                    self.lookup::<TimeSlot>(ctx, time_slot_id).await?
                } else {
                    self.find::<TimeSlot>(ctx, time_slot_id).await?
                };
                Ok(ResolvedSlot {
                    window: slot.window(),
                    catalog: Some(slot),
                })
            }
        }
    }

    async fn find<T>(&self, ctx: &TenantContext, id: T::Id) -> RosterServiceResult<T>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        <S as CatalogRepository<T>>::find_by_id(&*self.catalog, ctx, id)
            .await?
            .ok_or_else(|| {
                NotFoundError::Catalog {
                    kind: T::KIND,
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn lookup<T>(&self, ctx: &TenantContext, id: T::Id) -> RosterServiceResult<T>
    where
        T: CatalogEntry,
        S: CatalogRepository<T>,
    {
        let entry = self.find::<T>(ctx, id).await?;
        if !entry.entry_is_active() {
            return Err(ValidationError::InactiveEntry {
                kind: T::KIND,
                id: id.to_string(),
            }
            .into());
        }
        Ok(entry)
    }
}

fn ensure_slot_applies(slot: &TimeSlot, dates: &[NaiveDate]) -> Result<(), ValidationError> {
    let weekdays = slot.weekdays();
    dates
        .iter()
        .find(|date| !weekdays.contains(date.weekday()))
        .map_or(Ok(()), |date| {
            Err(ValidationError::SlotNotApplicable {
                slot: slot.code().clone(),
                date: *date,
            })
        })
}

fn validate_assignees(
    duty: &DutyDefinition,
    assignees: &[AssigneeRef],
) -> Result<(), ValidationError> {
    if assignees.is_empty() {
        return Err(ValidationError::NoAssignees);
    }
    let mut seen = BTreeSet::new();
    for assignee in assignees {
        if !seen.insert(assignee) {
            return Err(ValidationError::DuplicateAssignee(assignee.clone()));
        }
        if !duty.allowed_assignees().allows(assignee.kind()) {
            return Err(ValidationError::AssigneeKindNotAllowed {
                duty: duty.code().clone(),
                assignee: assignee.clone(),
            });
        }
    }
    let bounds = duty.bounds();
    if !bounds.admits(assignees.len()) {
        return Err(ValidationError::AssigneeCountOutOfBounds {
            duty: duty.code().clone(),
            count: assignees.len(),
            min: bounds.min(),
            max: bounds.max(),
        });
    }
    Ok(())
}
