//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes the table.

diesel::table! {
    /// Registered users.
    ///
    /// `id` and `created_at` are assigned by the database on insert. `email`
    /// is covered by the `users_email_key` unique index.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        /// Caller-supplied hash, stored verbatim.
        password_hash -> Varchar,
        subscribed -> Bool,
        birth_month -> Varchar,
        birth_year -> Int4,
        created_at -> Timestamptz,
    }
}
