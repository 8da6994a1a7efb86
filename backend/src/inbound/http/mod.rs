//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::{Scope, web};

pub mod auth;
pub mod customers;
pub mod dto;
pub mod error;
pub mod health;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Every `/api` endpoint.
///
/// Literal order routes are registered ahead of `/pedidos/{id}` so `novo`,
/// `buscar` and `mobile` are not captured as ids. Malformed bodies and query
/// strings are answered with `invalid_request`. Callers wrap the scope
/// with the session middleware.
pub fn api_scope() -> Scope {
    let (json_config, query_config) = error::extractor_configs();
    web::scope("/api")
        .app_data(json_config)
        .app_data(query_config)
        .service(auth::login)
        .service(auth::current_account)
        .service(auth::logout)
        .service(products::list_products)
        .service(customers::list_customers)
        .service(customers::get_customer)
        .service(customers::create_customer)
        .service(customers::update_customer)
        .service(customers::delete_customer)
        .service(orders::list_orders)
        .service(orders::blank_order)
        .service(orders::search_orders)
        .service(orders::create_mobile_order)
        .service(orders::create_order)
        .service(orders::get_order)
        .service(orders::get_order_items)
        .service(orders::get_order_details)
        .service(orders::update_order)
        .service(orders::delete_order)
        .service(order_items::list_items)
        .service(order_items::get_item)
        .service(order_items::create_item)
        .service(order_items::update_item)
        .service(order_items::delete_item)
}
