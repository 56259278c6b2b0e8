//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use booksyde::domain::DEFAULT_STORE_TIMEOUT;
use booksyde::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) store_timeout: Duration,
}

impl ServerConfig {
    /// Construct a configuration serving users from `db_pool`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Bound each user store call.
    #[must_use]
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }
}
