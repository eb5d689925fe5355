//! Application services for the roster: assignment engine, acceptance
//! workflow and reporting.

mod engine;
mod error;
mod reporting;
mod workflow;

pub use engine::{AssignmentEngine, ConflictOverride, ConflictQuery, CreateAssignmentRequest};
pub use error::{
    ErrorKind, InvalidStateError, NotFoundError, RosterServiceError, RosterServiceResult,
    ValidationError,
};
pub use reporting::{RosterReporting, WorkloadEntry};
pub use workflow::AcceptanceWorkflow;
