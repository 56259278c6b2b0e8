//! Driving ports used by the HTTP adapter for user operations.
//!
//! Handlers depend on these traits rather than on repositories so the
//! persistence and timeout policy stays inside the domain service.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, PublicUserSummary, UserRecord};

/// Use-case port for registering a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Persist a validated user and return the stored record.
    async fn register(&self, user: NewUser) -> Result<UserRecord, Error>;
}

/// Use-case port for listing registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return public summaries of the most recently registered users.
    async fn list_users(&self) -> Result<Vec<PublicUserSummary>, Error>;
}
