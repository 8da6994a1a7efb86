//! Shared harness for HTTP integration tests.
//!
//! Builds the full `/api` scope with session middleware over one in-memory
//! store, so requests observe each other's writes.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use serde_json::{Value, json};

use orders_backend::Trace;
use orders_backend::inbound::http::api_scope;
use orders_backend::inbound::http::state::{HttpState, HttpStatePorts};
use orders_backend::outbound::memory::{
    MemoryCustomerRepository, MemoryOrderRepository, MemoryStore, MemoryUserAccountRepository,
};

/// App over a fresh store seeded with the development account.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store = MemoryStore::with_development_account();
    let ports = HttpStatePorts::from_repositories(
        Arc::new(MemoryCustomerRepository::new(store.clone())),
        Arc::new(MemoryOrderRepository::new(store.clone())),
        Arc::new(MemoryUserAccountRepository::new(store)),
    );
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(orders_backend::inbound::http::session::SESSION_COOKIE_NAME.into())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .build();

    App::new()
        .app_data(web::Data::new(HttpState::new(ports)))
        .wrap(Trace)
        .service(api_scope().wrap(session))
}

/// Order payload using the Portuguese field aliases.
pub fn order_payload(name: &str, phone: &str, items: &[(&str, i64)], fee: f64) -> Value {
    json!({
        "cliente": { "nome": name, "telefone": phone, "endereco": "Rua das Flores, 10" },
        "dataEntrega": "2024-01-10T12:00:00",
        "taxaEntrega": fee,
        "itens": items
            .iter()
            .map(|(code, quantity)| json!({ "produto": code, "quantidade": quantity }))
            .collect::<Vec<_>>(),
    })
}

/// Mobile draft payload.
pub fn mobile_payload(name: &str, phone: &str, address: &str, items: &[(&str, i64)]) -> Value {
    json!({
        "name": name,
        "phone": phone,
        "address": address,
        "deliveryAt": "2024-02-01T09:30:00",
        "items": items
            .iter()
            .map(|(code, quantity)| json!({ "product": code, "quantity": quantity }))
            .collect::<Vec<_>>(),
    })
}
