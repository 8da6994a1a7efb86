//! Shared `bb8` pool of `diesel-async` PostgreSQL connections.
//!
//! Every repository adapter holds a clone of the same [`DbPool`]. The order
//! repository checks out one connection per aggregate write so a single
//! transaction spans the customer, order and item rows.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::warn;

/// Failure to build the pool or to check a connection out of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available within the checkout timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Connection pool sizing and timeouts.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use orders_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://orders@localhost/orders")
///     .with_max_size(4)
///     .with_min_idle(Some(8))
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.database_url(), "postgres://orders@localhost/orders");
/// assert_eq!(config.effective_min_idle(), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    pub const DEFAULT_MAX_SIZE: u32 = 10;
    pub const DEFAULT_MIN_IDLE: u32 = 2;
    pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

    /// Configuration for `database_url` with the default sizing.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: Self::DEFAULT_MAX_SIZE,
            min_idle: Some(Self::DEFAULT_MIN_IDLE),
            connection_timeout: Self::DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Idle target actually handed to `bb8`, never above `max_size`.
    pub fn effective_min_idle(&self) -> Option<u32> {
        self.min_idle.map(|idle| idle.min(self.max_size))
    }
}

/// Cloneable handle to the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool and open the idle connections.
    ///
    /// # Errors
    /// [`PoolError::Build`] when the URL is rejected or the initial
    /// connections fail.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let min_idle = config.effective_min_idle();
        if min_idle != config.min_idle {
            warn!(
                requested = ?config.min_idle,
                max_size = config.max_size,
                "pool min_idle exceeds max_size; clamping"
            );
        }
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// [`PoolError::Checkout`] when none frees up within the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_apply() {
        let config = PoolConfig::new("postgres://localhost/orders");

        assert_eq!(config.max_size, PoolConfig::DEFAULT_MAX_SIZE);
        assert_eq!(config.effective_min_idle(), Some(PoolConfig::DEFAULT_MIN_IDLE));
        assert_eq!(config.connection_timeout, PoolConfig::DEFAULT_CONNECTION_TIMEOUT);
    }

    #[rstest]
    #[case(Some(5), 20, Some(5))]
    #[case(Some(8), 4, Some(4))]
    #[case(None, 4, None)]
    #[case(Some(3), 0, Some(1))]
    fn min_idle_is_clamped_to_max_size(
        #[case] min_idle: Option<u32>,
        #[case] max_size: u32,
        #[case] expected: Option<u32>,
    ) {
        let config = PoolConfig::new("postgres://localhost/orders")
            .with_max_size(max_size)
            .with_min_idle(min_idle);
        assert_eq!(config.effective_min_idle(), expected);
    }

    #[rstest]
    fn error_messages_carry_cause() {
        assert!(
            PoolError::checkout("connection refused")
                .to_string()
                .contains("connection refused")
        );
        assert!(PoolError::build("invalid URL").to_string().contains("invalid URL"));
    }
}
