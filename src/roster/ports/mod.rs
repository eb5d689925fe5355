//! Port contracts for roster persistence.

pub mod repository;

#[cfg(test)]
pub use repository::MockRosterRepository;
pub use repository::{
    AssignmentBatch, AssignmentDetails, BookingGuard, OccurrenceChange, RosterRepository,
    RosterRepositoryError, RosterRepositoryResult, SiblingStatus, StateChange,
};
