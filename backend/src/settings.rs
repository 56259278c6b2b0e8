//! Service settings loaded via OrthoConfig.
//!
//! Values come from `BOOKSYDE_*` environment variables (or the matching
//! command-line flags). Only the database URL is mandatory; everything else
//! falls back to a default.
//!
//! `.env` files are not read and a bare `DB_URL` variable is ignored; export
//! the connection string as `BOOKSYDE_DB_URL` (for example
//! `BOOKSYDE_DB_URL=postgres://app@localhost/booksyde`).

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_STORE_TIMEOUT;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Startup failures. Any of these stops the process before it binds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("BOOKSYDE_DB_URL must be set to a PostgreSQL connection string")]
    MissingDatabaseUrl,
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
    #[error("failed to load settings: {message}")]
    Load { message: String },
}

/// Runtime settings for the HTTP service.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKSYDE")]
pub struct ServiceSettings {
    /// PostgreSQL connection string.
    pub db_url: Option<String>,
    /// Interface to bind; an IP address.
    pub host: Option<String>,
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Seconds a single user store call may take.
    pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for ServiceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSettings")
            .field("db_url", &self.db_url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("pool_max_size", &self.pool_max_size)
            .field(
                "pool_connection_timeout_secs",
                &self.pool_connection_timeout_secs,
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn positive_secs(
    field: &'static str,
    value: Option<u64>,
    default: Duration,
) -> Result<Duration, ConfigurationError> {
    match value {
        None => Ok(default),
        Some(0) => Err(ConfigurationError::InvalidValue {
            field,
            message: "must be greater than zero".to_owned(),
        }),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}

impl ServiceSettings {
    /// Load settings from the environment and the given arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Load`] when a value cannot be parsed.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::load_from_iter(args).map_err(|err| ConfigurationError::Load {
            message: err.to_string(),
        })
    }

    /// The configured connection string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, ConfigurationError> {
        self.db_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigurationError::MissingDatabaseUrl)
    }

    /// Socket address to bind, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidValue`] when `host` is not an IP
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigurationError> {
        let ip = match self.host.as_deref() {
            None => DEFAULT_HOST,
            Some(host) => host
                .trim()
                .parse()
                .map_err(|err: std::net::AddrParseError| ConfigurationError::InvalidValue {
                    field: "host",
                    message: err.to_string(),
                })?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Pool settings derived from the connection string and limits.
    ///
    /// # Errors
    ///
    /// Fails when the database URL is missing or a limit is zero.
    pub fn pool_config(&self) -> Result<PoolConfig, ConfigurationError> {
        let max_size = match self.pool_max_size {
            Some(0) => {
                return Err(ConfigurationError::InvalidValue {
                    field: "pool_max_size",
                    message: "must be greater than zero".to_owned(),
                });
            }
            Some(size) => size,
            None => DEFAULT_POOL_MAX_SIZE,
        };
        let timeout = positive_secs(
            "pool_connection_timeout_secs",
            self.pool_connection_timeout_secs,
            DEFAULT_POOL_CONNECTION_TIMEOUT,
        )?;
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(max_size)
            .with_connection_timeout(timeout))
    }

    /// Bound on each user store call.
    ///
    /// # Errors
    ///
    /// Fails when the configured timeout is zero.
    pub fn store_timeout(&self) -> Result<Duration, ConfigurationError> {
        positive_secs(
            "request_timeout_secs",
            self.request_timeout_secs,
            DEFAULT_STORE_TIMEOUT,
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for service settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "BOOKSYDE_DB_URL",
        "BOOKSYDE_HOST",
        "BOOKSYDE_PORT",
        "BOOKSYDE_POOL_MAX_SIZE",
        "BOOKSYDE_POOL_CONNECTION_TIMEOUT_SECS",
        "BOOKSYDE_REQUEST_TIMEOUT_SECS",
    ];

    fn env_with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load() -> ServiceSettings {
        ServiceSettings::load_from_args([OsString::from("booksyde")]).expect("config should load")
    }

    #[rstest]
    fn missing_database_url_is_reported() {
        let _guard = lock_env(env_with(&[]));

        let settings = load();
        assert_eq!(
            settings.database_url(),
            Err(ConfigurationError::MissingDatabaseUrl)
        );
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], 8080)))
        );
        assert!(matches!(
            settings.pool_config(),
            Err(ConfigurationError::MissingDatabaseUrl)
        ));
    }

    #[rstest]
    fn bare_db_url_variable_is_not_read() {
        let mut vars = env_with(&[]);
        vars.push(("DB_URL", Some("postgres://legacy/booksyde".to_owned())));
        let _guard = lock_env(vars);

        assert_eq!(
            load().database_url(),
            Err(ConfigurationError::MissingDatabaseUrl)
        );
    }

    #[rstest]
    fn blank_database_url_counts_as_missing() {
        let _guard = lock_env(env_with(&[("BOOKSYDE_DB_URL", "   ")]));

        assert_eq!(
            load().database_url(),
            Err(ConfigurationError::MissingDatabaseUrl)
        );
    }

    #[rstest]
    fn defaults_apply_when_only_database_url_is_set() {
        let _guard = lock_env(env_with(&[(
            "BOOKSYDE_DB_URL",
            "postgres://localhost/booksyde",
        )]));

        let settings = load();
        assert_eq!(settings.database_url(), Ok("postgres://localhost/booksyde"));
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], 8080)))
        );
        assert_eq!(settings.store_timeout(), Ok(DEFAULT_STORE_TIMEOUT));
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.max_size(), DEFAULT_POOL_MAX_SIZE);
        assert_eq!(pool.connection_timeout(), DEFAULT_POOL_CONNECTION_TIMEOUT);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("BOOKSYDE_DB_URL", "postgres://db/booksyde"),
            ("BOOKSYDE_HOST", "127.0.0.1"),
            ("BOOKSYDE_PORT", "9000"),
            ("BOOKSYDE_POOL_MAX_SIZE", "4"),
            ("BOOKSYDE_POOL_CONNECTION_TIMEOUT_SECS", "3"),
            ("BOOKSYDE_REQUEST_TIMEOUT_SECS", "2"),
        ]));

        let settings = load();
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 9000)))
        );
        assert_eq!(settings.store_timeout(), Ok(Duration::from_secs(2)));
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.connection_timeout(), Duration::from_secs(3));
    }

    #[rstest]
    #[case("BOOKSYDE_POOL_MAX_SIZE", "pool_max_size")]
    #[case("BOOKSYDE_POOL_CONNECTION_TIMEOUT_SECS", "pool_connection_timeout_secs")]
    fn zero_pool_limits_are_rejected(#[case] var: &'static str, #[case] field: &'static str) {
        let _guard = lock_env(env_with(&[
            ("BOOKSYDE_DB_URL", "postgres://db/x"),
            (var, "0"),
        ]));

        let err = load().pool_config().expect_err("zero must be rejected");
        assert!(matches!(err, ConfigurationError::InvalidValue { field: f, .. } if f == field));
    }

    #[rstest]
    fn non_ip_host_is_rejected() {
        let _guard = lock_env(env_with(&[("BOOKSYDE_HOST", "not a host")]));

        assert!(matches!(
            load().bind_addr(),
            Err(ConfigurationError::InvalidValue { field: "host", .. })
        ));
    }

    #[rstest]
    fn debug_output_hides_database_url() {
        let _guard = lock_env(env_with(&[(
            "BOOKSYDE_DB_URL",
            "postgres://app:hunter2@db/x",
        )]));

        let rendered = format!("{:?}", load());
        assert!(!rendered.contains("hunter2"));
    }
}
