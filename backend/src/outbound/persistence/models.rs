//! Internal Diesel row structs for the users table.
//!
//! These types never leave the persistence layer; repositories convert them
//! to and from domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{NewUser, NewUserDraft};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub subscribed: bool,
    pub birth_month: String,
    pub birth_year: i32,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Split the row into its id, unvalidated fields, and creation time.
    pub(crate) fn into_parts(self) -> (Uuid, NewUserDraft, DateTime<Utc>) {
        let draft = NewUserDraft {
            first_name: Some(self.first_name),
            last_name: Some(self.last_name),
            email: Some(self.email),
            password_hash: Some(self.password_hash),
            subscribed: Some(self.subscribed),
            birth_month: Some(self.birth_month),
            birth_year: Some(self.birth_year),
        };
        (self.id, draft, self.created_at)
    }
}

/// Insertable struct for creating user records. The database assigns `id`
/// and `created_at`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub subscribed: bool,
    pub birth_month: &'a str,
    pub birth_year: i32,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            first_name: user.first_name(),
            last_name: user.last_name(),
            email: user.email().as_ref(),
            password_hash: user.password_hash().expose(),
            subscribed: user.subscribed(),
            birth_month: user.birth_month(),
            birth_year: user.birth_year(),
        }
    }
}
