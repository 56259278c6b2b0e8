//! User registration and listing services.
//!
//! Implements the driving ports on top of a [`UserRepository`]. Every store
//! call runs under a request-scoped timeout so a stalled database surfaces as
//! a per-request `service_unavailable` error instead of a hung worker.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{UserPersistenceError, UserRegistration, UserRepository, UsersQuery};
use crate::domain::{Error, NewUser, PublicUserSummary, UserRecord};

/// Default bound on a single store round trip.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of users returned by the listing endpoint.
pub const USER_LISTING_LIMIT: u32 = 100;

/// Registration service implementing [`UserRegistration`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserRegistrationService<R> {
    repository: Arc<R>,
    store_timeout: Duration,
}

impl<R> UserRegistrationService<R> {
    /// Create a service using [`DEFAULT_STORE_TIMEOUT`].
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_timeout(repository, DEFAULT_STORE_TIMEOUT)
    }

    /// Create a service with an explicit store timeout.
    pub fn with_timeout(repository: Arc<R>, store_timeout: Duration) -> Self {
        Self {
            repository,
            store_timeout,
        }
    }
}

impl<R> UserRegistrationService<R>
where
    R: UserRepository,
{
    async fn bounded<T, Fut>(&self, operation: &'static str, fut: Fut) -> Result<T, Error>
    where
        Fut: Future<Output = Result<T, UserPersistenceError>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result.map_err(|err| Self::map_persistence_error(operation, err)),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis(),
                    "user store call timed out"
                );
                Err(Error::service_unavailable("user store timed out"))
            }
        }
    }

    fn map_persistence_error(operation: &'static str, error: UserPersistenceError) -> Error {
        warn!(operation, %error, "user store call failed");
        match error {
            UserPersistenceError::Connection { .. } => {
                Error::service_unavailable("user store unavailable")
            }
            UserPersistenceError::DuplicateEmail { email } => {
                Error::conflict("a user with this email already exists").with_details(json!({
                    "field": "email",
                    "value": email,
                    "code": "duplicate_email",
                }))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user store error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<R> UserRegistration for UserRegistrationService<R>
where
    R: UserRepository,
{
    async fn register(&self, user: NewUser) -> Result<UserRecord, Error> {
        let record = self
            .bounded("create_user", self.repository.create(&user))
            .await?;
        info!(user_id = %record.id(), "user registered");
        Ok(record)
    }
}

#[async_trait]
impl<R> UsersQuery for UserRegistrationService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<PublicUserSummary>, Error> {
        let records = self
            .bounded("list_users", self.repository.list_recent(USER_LISTING_LIMIT))
            .await?;
        Ok(records.iter().map(UserRecord::summary).collect())
    }
}

#[cfg(test)]
#[path = "user_registration_tests.rs"]
mod tests;
