//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use orders_backend::inbound::http::state::{HttpState, HttpStatePorts};
use orders_backend::outbound::memory::{
    DEVELOPMENT_ACCOUNT_EMAIL, MemoryCustomerRepository, MemoryOrderRepository, MemoryStore,
    MemoryUserAccountRepository,
};
use orders_backend::outbound::persistence::{
    DbPool, DieselCustomerRepository, DieselOrderRepository, DieselUserAccountRepository,
};

use super::ServerConfig;

fn diesel_ports(pool: &DbPool) -> HttpStatePorts {
    HttpStatePorts::from_repositories(
        Arc::new(DieselCustomerRepository::new(pool.clone())),
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(DieselUserAccountRepository::new(pool.clone())),
    )
}

fn memory_ports() -> HttpStatePorts {
    warn!(
        account = DEVELOPMENT_ACCOUNT_EMAIL,
        "no database configured: using in-memory repositories"
    );
    let store = MemoryStore::with_development_account();
    HttpStatePorts::from_repositories(
        Arc::new(MemoryCustomerRepository::new(store.clone())),
        Arc::new(MemoryOrderRepository::new(store.clone())),
        Arc::new(MemoryUserAccountRepository::new(store)),
    )
}

/// Build the handler state once so every worker shares the same adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool),
        None => memory_ports(),
    };
    web::Data::new(HttpState::new(ports))
}
