//! Acceptance workflow over individual occurrences.
//!
//! Each transition loads the occurrence and its parent, applies the domain
//! state machine, re-derives the parent status, and persists both together
//! with one audit entry.

use super::error::{InvalidStateError, NotFoundError, RosterServiceResult, ValidationError};
use crate::roster::{
    domain::{
        ActorId, AssignmentOccurrence, AuditAction, AuditLogEntry, AuditSnapshot, OccurrenceId,
        OccurrenceStatus, RosterDomainError,
    },
    ports::{OccurrenceChange, RosterRepository, SiblingStatus, StateChange},
};
use crate::tenant::domain::TenantContext;
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Occurrence-level transitions driven by assignees and administrators.
#[derive(Clone)]
pub struct AcceptanceWorkflow<R, C>
where
    R: RosterRepository,
    C: Clock + Send + Sync,
{
    roster: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> AcceptanceWorkflow<R, C>
where
    R: RosterRepository,
    C: Clock + Send + Sync,
{
    /// Creates a workflow over the roster repository.
    #[must_use]
    pub const fn new(roster: Arc<R>, clock: Arc<C>) -> Self {
        Self { roster, clock }
    }

    /// Records the assignee's acceptance of a pending occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`super::RosterServiceError::NotFound`] for unknown
    /// occurrences and [`super::RosterServiceError::InvalidState`] unless the
    /// occurrence is pending acceptance under an active assignment.
    #[tracing::instrument(skip(self, ctx), fields(tenant = %ctx.code()))]
    pub async fn accept(
        &self,
        ctx: &TenantContext,
        occurrence_id: OccurrenceId,
        actor: ActorId,
    ) -> RosterServiceResult<AssignmentOccurrence> {
        let by = actor.clone();
        self.transition(
            ctx,
            occurrence_id,
            actor,
            AuditAction::OccurrenceAccepted,
            None,
            |occurrence| occurrence.accept(by, &*self.clock),
        )
        .await
    }

    /// Records the assignee's refusal. No replacement is arranged.
    ///
    /// # Errors
    ///
    /// Returns [`super::RosterServiceError::Validation`] for a blank reason,
    /// [`super::RosterServiceError::NotFound`] for unknown occurrences and
    /// [`super::RosterServiceError::InvalidState`] unless the occurrence is
    /// pending acceptance under an active assignment.
    #[tracing::instrument(skip(self, ctx, reason), fields(tenant = %ctx.code()))]
    pub async fn decline(
        &self,
        ctx: &TenantContext,
        occurrence_id: OccurrenceId,
        actor: ActorId,
        reason: &str,
    ) -> RosterServiceResult<AssignmentOccurrence> {
        if reason.trim().is_empty() {
            return Err(ValidationError::Domain(RosterDomainError::EmptyDeclineReason).into());
        }
        let by = actor.clone();
        let recorded = Some(reason.trim().to_owned());
        self.transition(
            ctx,
            occurrence_id,
            actor,
            AuditAction::OccurrenceDeclined,
            recorded,
            |occurrence| occurrence.decline(by, reason, &*self.clock),
        )
        .await
    }

    /// Marks an occurrence as carried out. Only occurrences dated today or
    /// earlier can be completed.
    ///
    /// # Errors
    ///
    /// Returns [`super::RosterServiceError::NotFound`] for unknown
    /// occurrences and [`super::RosterServiceError::InvalidState`] for future
    /// dates, for occurrences that are neither accepted nor scheduled, and
    /// for inactive assignments.
    #[tracing::instrument(skip(self, ctx, notes), fields(tenant = %ctx.code()))]
    pub async fn complete(
        &self,
        ctx: &TenantContext,
        occurrence_id: OccurrenceId,
        actor: ActorId,
        notes: Option<String>,
    ) -> RosterServiceResult<AssignmentOccurrence> {
        let by = actor.clone();
        self.transition(
            ctx,
            occurrence_id,
            actor,
            AuditAction::OccurrenceCompleted,
            None,
            |occurrence| occurrence.complete(by, notes, &*self.clock),
        )
        .await
    }

    /// Withdraws a single live occurrence, leaving the rest of the
    /// assignment in place.
    ///
    /// # Errors
    ///
    /// Returns [`super::RosterServiceError::Validation`] for a blank reason,
    /// [`super::RosterServiceError::NotFound`] for unknown occurrences and
    /// [`super::RosterServiceError::InvalidState`] for terminal occurrences
    /// or inactive assignments.
    #[tracing::instrument(skip(self, ctx, reason), fields(tenant = %ctx.code()))]
    pub async fn cancel_occurrence(
        &self,
        ctx: &TenantContext,
        occurrence_id: OccurrenceId,
        actor: ActorId,
        reason: &str,
    ) -> RosterServiceResult<AssignmentOccurrence> {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCancelReason.into());
        }
        self.transition(
            ctx,
            occurrence_id,
            actor,
            AuditAction::OccurrenceCancelled,
            Some(trimmed.to_owned()),
            |occurrence| occurrence.cancel(&*self.clock),
        )
        .await
    }

    async fn transition<F>(
        &self,
        ctx: &TenantContext,
        occurrence_id: OccurrenceId,
        actor: ActorId,
        action: AuditAction,
        reason: Option<String>,
        change: F,
    ) -> RosterServiceResult<AssignmentOccurrence>
    where
        F: FnOnce(&mut AssignmentOccurrence) -> Result<(), RosterDomainError> + Send,
    {
        let mut occurrence = self
            .roster
            .find_occurrence(ctx, occurrence_id)
            .await?
            .ok_or(NotFoundError::Occurrence(occurrence_id))?;
        let assignment_id = occurrence.assignment_id();
        let mut details = self
            .roster
            .find_assignment(ctx, assignment_id)
            .await?
            .ok_or(NotFoundError::Assignment(assignment_id))?;

        let parent_before = details.assignment.status();
        if !parent_before.admits_occurrence_changes() {
            return Err(InvalidStateError::AssignmentNotActive {
                id: assignment_id,
                status: parent_before,
            }
            .into());
        }

        let before = occurrence.status();
        change(&mut occurrence)?;
        let after = occurrence.status();

        let siblings: Vec<SiblingStatus> = details
            .occurrences
            .iter()
            .filter(|sibling| sibling.id() != occurrence_id)
            .map(|sibling| SiblingStatus {
                id: sibling.id(),
                expected: sibling.status(),
            })
            .collect();
        let statuses: Vec<OccurrenceStatus> = siblings
            .iter()
            .map(|sibling| sibling.expected)
            .chain(std::iter::once(after))
            .collect();
        let parent_after = parent_before.settle(&statuses);
        if parent_after != parent_before {
            details
                .assignment
                .transition_to(parent_after, &*self.clock)?;
        }

        let date = occurrence.date();
        let entry = AuditLogEntry::new(assignment_id, action, actor, &*self.clock)
            .for_occurrence(occurrence_id)
            .with_change(
                Some(AuditSnapshot::Occurrence {
                    date,
                    status: before,
                }),
                AuditSnapshot::Occurrence {
                    date,
                    status: after,
                },
            )
            .with_reason(reason);
        self.roster
            .apply_change(ctx, StateChange {
                assignment: details.assignment,
                expected: parent_before,
                occurrences: vec![OccurrenceChange {
                    occurrence: occurrence.clone(),
                    expected: before,
                }],
                siblings,
                audit: vec![entry],
            })
            .await?;

        info!(
            %occurrence_id,
            %assignment_id,
            action = %action,
            from = %before,
            to = %after,
            assignment_status = %parent_after,
            "occurrence transitioned"
        );
        Ok(occurrence)
    }
}
