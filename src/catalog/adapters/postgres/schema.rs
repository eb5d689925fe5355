//! Diesel schema for the master catalogs.

diesel::table! {
    /// Duty definitions.
    duty_definitions (id) {
        /// Definition identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Tenant-unique code.
        #[max_length = 50]
        code -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-text description.
        description -> Nullable<Text>,
        /// Duty category.
        #[max_length = 50]
        category -> Varchar,
        /// Allowed assignee kinds as a JSON array.
        allowed_assignees -> Jsonb,
        /// Risk level.
        #[max_length = 20]
        risk_level -> Varchar,
        /// Whether a supervisor is mandatory.
        supervisor_required -> Bool,
        /// Default time slot.
        default_time_slot_id -> Nullable<Uuid>,
        /// Default location.
        default_location_id -> Nullable<Uuid>,
        /// Minimum simultaneous assignees.
        min_assignees -> Nullable<Int2>,
        /// Maximum simultaneous assignees.
        max_assignees -> Nullable<Int2>,
        /// Weekly cap for students.
        student_weekly_cap -> Nullable<Int2>,
        /// Soft-delete flag.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named recurring time slots.
    time_slots (id) {
        /// Slot identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Tenant-unique code.
        #[max_length = 50]
        code -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Window start.
        start_time -> Time,
        /// Window end.
        end_time -> Time,
        /// Weekday bitmask, bit 0 is Monday.
        weekdays -> Int2,
        /// Soft-delete flag.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Physical locations.
    locations (id) {
        /// Location identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Tenant-unique code.
        #[max_length = 50]
        code -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Zone type.
        #[max_length = 50]
        location_type -> Varchar,
        /// Building name.
        #[max_length = 255]
        building -> Nullable<Varchar>,
        /// Floor label.
        #[max_length = 50]
        floor -> Nullable<Varchar>,
        /// Advisory capacity.
        capacity -> Nullable<Int4>,
        /// Soft-delete flag.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Roster roles.
    roster_roles (id) {
        /// Role identifier.
        id -> Uuid,
        /// Owning tenant.
        tenant_id -> Uuid,
        /// Tenant-unique code.
        #[max_length = 50]
        code -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-text description.
        description -> Nullable<Text>,
        /// Soft-delete flag.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
