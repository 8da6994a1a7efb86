//! Embedded PostgreSQL helpers for the Diesel repository suites.
//!
//! Each test gets its own temporary database on a shared cluster with the
//! crate's embedded migrations applied. When the cluster cannot start, tests
//! fail loudly unless `SKIP_TEST_CLUSTER` is truthy, in which case they log a
//! skip marker and return early.

use std::thread;
use std::time::Duration;

use orders_backend::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns true when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`
/// (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip marker when skipping is allowed, otherwise a panic so CI breakage
/// is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Keep `PG_PASSWORD` stable so a reused data directory still accepts the
/// password it was initialised with.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", "orders_embedded_test");
        }
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= SHARED_CLUSTER_RETRIES => {
                return Err(format!("shared cluster: {error:?}"));
            }
            Err(_) => {
                thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Fresh migrated database; dropped with the returned handle.
pub fn provision_database() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster()?;
    let name = format!("orders_test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    run_pending_migrations(database.url()).map_err(|err| format!("migrate: {err}"))?;
    Ok(database)
}
