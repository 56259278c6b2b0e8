//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, UserId, UserRecord};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Unique index guarding `users.email`.
const EMAIL_UNIQUE_INDEX: &str = "users_email_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error, email: Option<&str>) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation(constraint)
            if constraint.as_deref().is_none_or(|name| name == EMAIL_UNIQUE_INDEX) =>
        {
            match email {
                Some(email) => UserPersistenceError::duplicate_email(email),
                None => UserPersistenceError::query("unexpected unique violation"),
            }
        }
        DieselFailure::UniqueViolation(_) => UserPersistenceError::query("unique constraint violated"),
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

/// Validate a stored row back into the domain.
///
/// Rows written by this adapter always validate; a failure means the table
/// was edited out of band.
fn row_to_record(row: UserRow) -> Result<UserRecord, UserPersistenceError> {
    let (id, draft, created_at) = row.into_parts();
    let user = NewUser::try_from(draft).map_err(|err| {
        warn!(user_id = %id, error = %err, "stored user row failed validation");
        UserPersistenceError::query(format!("stored user {id} is invalid: {err}"))
    })?;
    Ok(UserRecord::new(UserId::from_uuid(id), user, created_at))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<UserRecord, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;

        let row = diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.email().as_ref())))?;

        row_to_record(row)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<UserRecord>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, UserPersistenceError::connection))?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order((users::created_at.desc(), users::id.desc()))
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        rows.into_iter().map(row_to_record).collect()
    }
}
