//! Shared error mapping for the Diesel repositories.
//!
//! Every repository port exposes `Connection` and `Query` variants; the
//! helpers here take those constructors so each adapter maps pool and Diesel
//! failures the same way.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Unique constraint protecting `customers.phone`.
pub(crate) const CUSTOMER_PHONE_CONSTRAINT: &str = "customers_phone_key";

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

/// Map common Diesel error variants into query/connection constructors.
///
/// Driver messages are logged at debug level and never returned, so callers
/// cannot leak SQL details into API responses.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
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
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Whether `error` is a violation of the customer phone uniqueness constraint.
pub(crate) fn is_phone_violation(error: &DieselError) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => info
            .constraint_name()
            .map_or_else(
                || info.message().contains(CUSTOMER_PHONE_CONSTRAINT),
                |name| name == CUSTOMER_PHONE_CONSTRAINT,
            ),
        _ => false,
    }
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
