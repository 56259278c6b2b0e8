//! Driven port for user persistence and its error type.

use async_trait::async_trait;

use crate::domain::{NewUser, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// The email is already registered and the store enforces uniqueness.
        DuplicateEmail { email: String } => "user with email {email} already exists",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Storage for registered users.
///
/// The store owns identity: `create` returns the row as written, including the
/// generated identifier and creation timestamp.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return the written row.
    async fn create(&self, user: &NewUser) -> Result<UserRecord, UserPersistenceError>;

    /// Return up to `limit` users, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<UserRecord>, UserPersistenceError>;
}
