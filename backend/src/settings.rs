//! Application settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `ORDERS_*` environment variables and an
//! optional configuration file. Optional fields fall back to defaults through
//! the accessor methods.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Raised when a configured value cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Configuration values controlling server startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ORDERS")]
pub struct AppSettings {
    /// PostgreSQL connection URL. In-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Maximum number of pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept open by the pool.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Generate a temporary session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Apply pending schema migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    /// Return the parsed listen address.
    ///
    /// # Errors
    /// [`SettingsError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    /// Return the configured session key path, falling back to the default.
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether a generated session key may replace an unreadable key file.
    ///
    /// Debug builds always allow it.
    pub fn allow_ephemeral_session_key(&self) -> bool {
        cfg!(debug_assertions) || self.session_allow_ephemeral
    }

    /// Pool configuration, or `None` when no database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().filter(|url| !url.trim().is_empty())?;
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(PoolConfig::DEFAULT_MAX_SIZE))
                .with_min_idle(Some(
                    self.pool_min_idle.unwrap_or(PoolConfig::DEFAULT_MIN_IDLE),
                ))
                .with_connection_timeout(
                    self.pool_connection_timeout_secs
                        .map_or(PoolConfig::DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs),
                ),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "ORDERS_DATABASE_URL",
        "ORDERS_BIND_ADDR",
        "ORDERS_POOL_MAX_SIZE",
        "ORDERS_POOL_MIN_IDLE",
        "ORDERS_POOL_CONNECTION_TIMEOUT_SECS",
        "ORDERS_SESSION_KEY_FILE",
        "ORDERS_SESSION_ALLOW_EPHEMERAL",
        "ORDERS_COOKIE_SECURE",
        "ORDERS_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("orders-backend")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
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

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert!(settings.pool_config().is_none());
        assert_eq!(
            settings.bind_addr().expect("default bind addr"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert_eq!(
            settings.session_key_file(),
            Path::new(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(settings.cookie_secure);
        assert!(settings.run_migrations);
        assert!(!settings.session_allow_ephemeral);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("ORDERS_DATABASE_URL", "postgres://orders@db/orders"),
            ("ORDERS_BIND_ADDR", "127.0.0.1:9000"),
            ("ORDERS_POOL_MAX_SIZE", "4"),
            ("ORDERS_SESSION_KEY_FILE", "/tmp/orders_key"),
            ("ORDERS_COOKIE_SECURE", "false"),
        ]));

        let settings = load_from_empty_args();
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.database_url(), "postgres://orders@db/orders");
        assert_eq!(pool.effective_min_idle(), Some(PoolConfig::DEFAULT_MIN_IDLE));
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(settings.session_key_file(), Path::new("/tmp/orders_key"));
        assert!(!settings.cookie_secure);
    }

    #[rstest]
    fn invalid_bind_address_is_reported() {
        let _guard = lock_env(env_with(&[("ORDERS_BIND_ADDR", "not-an-address")]));

        let settings = load_from_empty_args();
        let err = settings.bind_addr().expect_err("invalid address");
        assert!(matches!(err, SettingsError::InvalidBindAddr { ref value, .. } if value == "not-an-address"));
    }

    #[rstest]
    fn blank_database_url_selects_memory_adapters() {
        let _guard = lock_env(env_with(&[("ORDERS_DATABASE_URL", "  ")]));
        assert!(load_from_empty_args().pool_config().is_none());
    }
}
