//! Diesel schema for the shared tenant directory.

diesel::table! {
    /// Tenants served by this deployment.
    tenants (id) {
        /// Tenant identifier.
        id -> Uuid,
        /// Unique routing code.
        #[max_length = 64]
        code -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Connection string of the tenant database.
        database_url -> Text,
        /// Organisation settings payload.
        settings -> Jsonb,
        /// Whether the tenant may be served.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
