//! Shared classification of Diesel and pool failures.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse failure categories repositories translate into port errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be established.
    Connection(&'static str),
    /// A unique index rejected the write; carries the index name if known.
    UniqueViolation(Option<String>),
    /// Any other query failure.
    Query(&'static str),
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Classify a Diesel error, logging the driver detail at debug level.
///
/// Driver messages may echo column values, so they are logged but never
/// returned.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        _ => DieselFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    #[rstest]
    fn unique_violation_keeps_constraint_name() {
        let failure = classify_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("users_email_key"),
        ));
        assert_eq!(
            failure,
            DieselFailure::UniqueViolation(Some("users_email_key".to_owned()))
        );
    }

    #[rstest]
    fn closed_connection_is_a_connection_failure() {
        let failure = classify_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(failure, DieselFailure::Connection(_)));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation, None))]
    #[case(DieselError::RollbackTransaction)]
    fn other_failures_are_query_failures(#[case] error: DieselError) {
        assert!(matches!(classify_diesel_error(error), DieselFailure::Query(_)));
    }

    #[rstest]
    fn pool_errors_use_the_connection_constructor() {
        let mapped: String =
            map_basic_pool_error(PoolError::checkout("timed out"), |message| message);
        assert_eq!(mapped, "timed out");
    }
}
