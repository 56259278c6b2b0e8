//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`, so they depend only
//! on the driving ports and stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{UserRegistration, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn UserRegistration>,
    pub users: Arc<dyn UsersQuery>,
}

impl HttpState {
    /// Bundle port implementations for handler injection.
    pub fn new(registration: Arc<dyn UserRegistration>, users: Arc<dyn UsersQuery>) -> Self {
        Self {
            registration,
            users,
        }
    }
}
