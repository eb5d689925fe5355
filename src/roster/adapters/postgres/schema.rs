//! Diesel schema for roster tables.

diesel::table! {
    /// Assignments of duties to people.
    roster_assignments (id) {
        /// Assignment identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Assigned duty.
        duty_id -> Uuid,
        /// Recurrence pattern as JSON.
        recurrence -> Jsonb,
        /// Catalog time slot, absent for custom windows.
        time_slot_id -> Nullable<Uuid>,
        /// Window start.
        start_time -> Time,
        /// Window end.
        end_time -> Time,
        /// Location selection as JSON.
        location -> Nullable<Jsonb>,
        /// Assignee kind.
        #[max_length = 20]
        assignee_kind -> Varchar,
        /// External assignee identifier.
        #[max_length = 64]
        assignee_id -> Varchar,
        /// Supervising staff identifier.
        #[max_length = 64]
        supervisor_id -> Nullable<Varchar>,
        /// Role held on the duty.
        role_id -> Nullable<Uuid>,
        /// Assignment status.
        #[max_length = 30]
        status -> Varchar,
        /// Whether occurrences need acceptance.
        acceptance_required -> Bool,
        /// Conflict override reason.
        override_reason -> Nullable<Text>,
        /// Free-text notes.
        notes -> Nullable<Text>,
        /// Creating administrator.
        #[max_length = 64]
        created_by -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dated occurrences of assignments.
    roster_occurrences (id) {
        /// Occurrence identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Parent assignment.
        assignment_id -> Uuid,
        /// Assigned duty.
        duty_id -> Uuid,
        /// Assignee kind.
        #[max_length = 20]
        assignee_kind -> Varchar,
        /// External assignee identifier.
        #[max_length = 64]
        assignee_id -> Varchar,
        /// Catalog time slot.
        time_slot_id -> Nullable<Uuid>,
        /// Calendar date.
        occurrence_date -> Date,
        /// Window start.
        start_time -> Time,
        /// Window end.
        end_time -> Time,
        /// Occurrence status.
        #[max_length = 30]
        status -> Varchar,
        /// Whether the booking was forced past conflicts.
        conflict_override -> Bool,
        /// Accepting actor.
        #[max_length = 64]
        accepted_by -> Nullable<Varchar>,
        /// Acceptance timestamp.
        accepted_at -> Nullable<Timestamptz>,
        /// Declining actor.
        #[max_length = 64]
        declined_by -> Nullable<Varchar>,
        /// Decline timestamp.
        declined_at -> Nullable<Timestamptz>,
        /// Decline reason.
        decline_reason -> Nullable<Text>,
        /// Completing actor.
        #[max_length = 64]
        completed_by -> Nullable<Varchar>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Completion notes.
        completion_notes -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail.
    roster_audit_log (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Affected assignment.
        assignment_id -> Uuid,
        /// Affected occurrence.
        occurrence_id -> Nullable<Uuid>,
        /// Recorded action.
        #[max_length = 40]
        action -> Varchar,
        /// State before the action.
        before_state -> Nullable<Jsonb>,
        /// State after the action.
        after_state -> Nullable<Jsonb>,
        /// Acting user.
        #[max_length = 64]
        actor -> Varchar,
        /// Free-text reason.
        reason -> Nullable<Text>,
        /// Recording timestamp.
        recorded_at -> Timestamptz,
        /// Insertion order, assigned by the database.
        seq -> Int8,
    }
}
