//! Domain model for roster assignments, occurrences, and their audit trail.
//!
//! An assignment binds one duty to one assignee over a [`Recurrence`]. Each
//! expanded date becomes an [`AssignmentOccurrence`], the unit the
//! acceptance workflow acts on. Every state change appends an
//! [`AuditLogEntry`]; nothing is ever deleted.

mod assignee;
mod assignment;
mod audit;
mod conflict;
mod error;
mod ids;
mod load;
mod occurrence;
mod recurrence;
mod selection;
mod status;

pub use assignee::AssigneeRef;
pub use assignment::{NewAssignment, PersistedAssignment, RosterAssignment};
pub use audit::{AuditAction, AuditLogEntry, AuditSnapshot, PersistedAuditEntry};
pub use conflict::{
    AssigneeAvailability, Booking, Conflict, ConflictReport, DateAvailability, DateCheck,
};
pub use error::{ParseRosterValueError, RosterDomainError};
pub use ids::{ActorId, AssigneeId, AssignmentId, AuditEntryId, OccurrenceId};
pub use load::{CapacityBreach, WeeklyLoad};
pub use occurrence::{AssignmentOccurrence, Decision, PersistedOccurrence};
pub use recurrence::Recurrence;
pub(crate) use recurrence::week_start;
pub use selection::{LocationSelection, SlotSelection};
pub use status::{AssignmentStatus, OccurrenceStatus};
