//! Backend entry-point: loads settings, wires storage and serves the API.

mod server;
#[cfg(test)]
mod tests;

use std::ffi::OsString;
use std::io;
use std::path::Path;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use cap_std::{ambient_authority, fs::Dir};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use orders_backend::inbound::http::health::HealthState;
use orders_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use orders_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Shortest key material `Key::derive_from` accepts.
const MIN_SESSION_KEY_LEN: usize = 32;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let key = load_session_key(
        settings.session_key_file(),
        settings.allow_ephemeral_session_key(),
    )?;

    let config = ServerConfig::new(key, settings.cookie_secure, SameSite::Lax, bind_addr);
    let config = match settings.pool_config() {
        Some(pool_config) => {
            if settings.run_migrations {
                migrate(&pool_config).await?;
            }
            let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
            config.with_db_pool(pool)
        }
        None => config,
    };
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::build_metrics());

    info!(
        addr = %config.bind_addr(),
        database = config.uses_database(),
        "starting orders backend"
    );
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

/// Layer CLI flags from `args` over `ORDERS_*` variables and config files.
pub(crate) fn load_settings<I, T>(args: I) -> io::Result<AppSettings>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    AppSettings::load_from_iter(args)
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))
}

/// Apply pending migrations off the async runtime.
async fn migrate(pool_config: &PoolConfig) -> io::Result<()> {
    let url = pool_config.database_url().to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!(applied, "database schema up to date");
    Ok(())
}

fn read_key_file(path: &Path) -> io::Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("session key path {} has no file name", path.display()),
        )
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    let bytes = dir.read(Path::new(file_name))?;
    if bytes.len() < MIN_SESSION_KEY_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("session key must be at least {MIN_SESSION_KEY_LEN} bytes"),
        ));
    }
    Ok(bytes)
}

/// Derive the cookie signing key from `path`.
///
/// An unreadable or short key file is fatal unless `allow_ephemeral` is set,
/// in which case a random key is generated and sessions end on restart.
pub(crate) fn load_session_key(path: &Path, allow_ephemeral: bool) -> io::Result<Key> {
    match read_key_file(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) if allow_ephemeral => {
            warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(e) => Err(io::Error::new(
            e.kind(),
            format!("failed to read session key at {}: {e}", path.display()),
        )),
    }
}
