//! Error taxonomy shared by the roster services.
//!
//! Every failure falls into one [`ErrorKind`]; callers map the kind to a
//! user-facing message and an HTTP-equivalent status. Nothing here is
//! retried by the services.

use crate::catalog::{
    domain::{CatalogCode, CatalogKind},
    ports::CatalogRepositoryError,
};
use crate::roster::{
    domain::{
        AssigneeRef, AssignmentId, AssignmentStatus, CapacityBreach, ConflictReport,
        OccurrenceId, RosterDomainError,
    },
    ports::RosterRepositoryError,
};
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or disallowed input.
    Validation,
    /// Overlapping bookings.
    Conflict,
    /// Student weekly cap exceeded.
    CapacityExceeded,
    /// Transition attempted from a state that forbids it.
    InvalidState,
    /// Referenced record does not exist for the tenant.
    NotFound,
    /// Infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status code for the category.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Conflict | Self::InvalidState => 409,
            Self::CapacityExceeded => 422,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}

/// Input rejected before any state changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A domain value failed validation.
    #[error(transparent)]
    Domain(RosterDomainError),

    /// A referenced catalog entry has been deactivated.
    #[error("{kind} {id} is inactive")]
    InactiveEntry {
        /// Catalog concerned.
        kind: CatalogKind,
        /// Rendered identifier.
        id: String,
    },

    /// No assignee was proposed.
    #[error("at least one assignee is required")]
    NoAssignees,

    /// The same assignee was proposed twice.
    #[error("assignee {0} is listed more than once")]
    DuplicateAssignee(AssigneeRef),

    /// The duty does not accept this kind of assignee.
    #[error("duty {duty} does not accept {assignee}")]
    AssigneeKindNotAllowed {
        /// Duty code.
        duty: CatalogCode,
        /// Rejected assignee.
        assignee: AssigneeRef,
    },

    /// The number of assignees is outside the duty's bounds.
    #[error("duty {duty} takes between {min:?} and {max:?} assignees, got {count}")]
    AssigneeCountOutOfBounds {
        /// Duty code.
        duty: CatalogCode,
        /// Proposed count.
        count: usize,
        /// Lower bound.
        min: Option<u16>,
        /// Upper bound.
        max: Option<u16>,
    },

    /// The duty needs a supervisor and none was named.
    #[error("duty {duty} requires a supervisor")]
    SupervisorRequired {
        /// Duty code.
        duty: CatalogCode,
    },

    /// Neither the request nor the duty names a time slot.
    #[error("duty {duty} has no default time slot and none was given")]
    MissingTimeSlot {
        /// Duty code.
        duty: CatalogCode,
    },

    /// The catalog slot does not run on one of the expanded dates.
    #[error("time slot {slot} does not apply on {date}")]
    SlotNotApplicable {
        /// Slot code.
        slot: CatalogCode,
        /// First date the slot does not cover.
        date: NaiveDate,
    },

    /// The organisation does not allow conflict overrides.
    #[error("conflict overrides are disabled for this organisation")]
    OverrideNotPermitted,

    /// A cancellation was submitted without a reason.
    #[error("a cancellation reason is required")]
    EmptyCancelReason,
}

/// A transition was attempted from a state that forbids it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStateError {
    /// The domain state machine rejected the move.
    #[error(transparent)]
    Transition(RosterDomainError),

    /// The parent assignment does not accept occurrence changes.
    #[error("assignment {id} is {status} and accepts no occurrence changes")]
    AssignmentNotActive {
        /// Assignment concerned.
        id: AssignmentId,
        /// Its current status.
        status: AssignmentStatus,
    },

    /// The assignment is not waiting for approval.
    #[error("assignment {id} is {status}, not pending approval")]
    NotAwaitingApproval {
        /// Assignment concerned.
        id: AssignmentId,
        /// Its current status.
        status: AssignmentStatus,
    },

    /// Some occurrence was already carried out.
    #[error("assignment {0} has completed occurrences")]
    HasCompletedOccurrences(AssignmentId),

    /// A concurrent request changed the record first.
    #[error("{entity} {id} was modified concurrently")]
    Concurrent {
        /// Kind of record.
        entity: &'static str,
        /// Rendered identifier.
        id: String,
    },
}

/// A referenced record does not exist for the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    /// Missing catalog entry.
    #[error("{kind} not found: {id}")]
    Catalog {
        /// Catalog concerned.
        kind: CatalogKind,
        /// Rendered identifier.
        id: String,
    },

    /// Missing assignment.
    #[error("assignment not found: {0}")]
    Assignment(AssignmentId),

    /// Missing occurrence.
    #[error("occurrence not found: {0}")]
    Occurrence(OccurrenceId),
}

/// Errors returned by the roster services.
#[derive(Debug, Clone, Error)]
pub enum RosterServiceError {
    /// Malformed or disallowed input.
    #[error(transparent)]
    Validation(ValidationError),

    /// Proposed bookings overlap existing ones.
    #[error("assignment conflicts with existing bookings")]
    Conflict(ConflictReport),

    /// Student weekly cap exceeded.
    #[error(transparent)]
    CapacityExceeded(CapacityBreach),

    /// Transition not permitted from the current state.
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// Referenced record does not exist.
    #[error(transparent)]
    NotFound(NotFoundError),

    /// Infrastructure failure; the transaction was rolled back.
    #[error("internal error: {0}")]
    Internal(Arc<dyn std::error::Error + Send + Sync>),
}

impl RosterServiceError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::CapacityExceeded(_) => ErrorKind::CapacityExceeded,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Wraps an infrastructure failure.
    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<ValidationError> for RosterServiceError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<InvalidStateError> for RosterServiceError {
    fn from(err: InvalidStateError) -> Self {
        Self::InvalidState(err)
    }
}

impl From<NotFoundError> for RosterServiceError {
    fn from(err: NotFoundError) -> Self {
        Self::NotFound(err)
    }
}

impl From<RosterDomainError> for RosterServiceError {
    fn from(err: RosterDomainError) -> Self {
        if err.is_state_error() {
            Self::InvalidState(InvalidStateError::Transition(err))
        } else {
            Self::Validation(ValidationError::Domain(err))
        }
    }
}

impl From<RosterRepositoryError> for RosterServiceError {
    fn from(err: RosterRepositoryError) -> Self {
        match err {
            RosterRepositoryError::Conflict(report) => Self::Conflict(report),
            RosterRepositoryError::CapacityExceeded(breach) => Self::CapacityExceeded(breach),
            RosterRepositoryError::StaleState { entity, id } => {
                Self::InvalidState(InvalidStateError::Concurrent { entity, id })
            }
            other => Self::internal(other),
        }
    }
}

impl From<CatalogRepositoryError> for RosterServiceError {
    fn from(err: CatalogRepositoryError) -> Self {
        match err {
            CatalogRepositoryError::NotFound { kind, id } => {
                Self::NotFound(NotFoundError::Catalog { kind, id })
            }
            other => Self::internal(other),
        }
    }
}

/// Result type for roster service operations.
pub type RosterServiceResult<T> = Result<T, RosterServiceError>;
