//! Tests for the backend bootstrap: settings loading, session key loading
//! and readiness signalling.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use super::{load_session_key, load_settings};
use super::server::{ServerConfig, create_server};
use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use cap_std::{ambient_authority, fs::Dir};
use env_lock::lock_env;
use orders_backend::inbound::http::health::HealthState;
use rstest::{fixture, rstest};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn session_key() -> Key {
    Key::generate()
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

fn write_key(name: &str, contents: &[u8]) -> PathBuf {
    let dir_path = std::env::temp_dir();
    let dir = Dir::open_ambient_dir(&dir_path, ambient_authority()).expect("open temp dir");
    dir.write(name, contents).expect("write key file");
    dir_path.join(name)
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready_with_memory_storage(
    health_state: web::Data<HealthState>,
    session_key: Key,
    bind_address: SocketAddr,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let config = ServerConfig::new(session_key, false, SameSite::Lax, bind_address);
    assert!(!config.uses_database());
    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[cfg(feature = "metrics")]
#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready_with_metrics(
    health_state: web::Data<HealthState>,
    session_key: Key,
    bind_address: SocketAddr,
) {
    let metrics = super::server::build_metrics();
    assert!(metrics.is_some(), "metrics should build");
    let config = ServerConfig::new(session_key, false, SameSite::Lax, bind_address)
        .with_metrics(metrics);

    let _server = create_server(health_state.clone(), config).expect("server should build");
    assert!(health_state.is_ready());
}

#[rstest]
fn key_file_is_read_through_cap_std() {
    let path = write_key("orders-backend-session-key-valid", &[7_u8; 64]);
    let key = load_session_key(&path, false).expect("key loads");
    assert_eq!(key.master(), Key::derive_from(&[7_u8; 64]).master());
}

#[rstest]
fn short_key_file_is_rejected() {
    let path = write_key("orders-backend-session-key-short", b"too short");
    let err = load_session_key(&path, false).err().expect("short key");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[rstest]
#[case(false, true)]
#[case(true, false)]
fn missing_key_file_depends_on_ephemeral_flag(
    #[case] allow_ephemeral: bool,
    #[case] expect_error: bool,
) {
    let path = Path::new("/nonexistent-orders-backend/session_key");
    assert_eq!(load_session_key(path, allow_ephemeral).is_err(), expect_error);
}

#[rstest]
fn settings_load_from_the_environment() {
    let _guard = lock_env([
        ("ORDERS_BIND_ADDR", Some("127.0.0.1:9100")),
        ("ORDERS_DATABASE_URL", None),
    ]);

    let settings = load_settings(["orders-backend"]).expect("settings load");
    assert_eq!(
        settings.bind_addr().expect("bind addr"),
        SocketAddr::from(([127, 0, 0, 1], 9100))
    );
    assert!(settings.pool_config().is_none());
}

#[rstest]
fn unknown_flags_fail_settings_loading() {
    let err = load_settings(["orders-backend", "--no-such-flag"]).expect_err("unknown flag");
    assert!(err.to_string().contains("failed to load settings"));
}
