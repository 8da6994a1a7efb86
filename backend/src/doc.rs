//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP endpoint, the request/response
//! DTOs, the error schema wrappers and the session cookie scheme. The
//! document backs Swagger UI (debug builds) and `cargo run --bin
//! openapi-dump`.

use crate::inbound::http::auth::{AccountResponse, LoginRequest};
use crate::inbound::http::dto::{
    CustomerRequest, CustomerResponse, ItemRecordResponse, ItemRequest, ItemResourceRequest,
    MobileOrderRequest, OrderItemResponse, OrderRequest, OrderResponse, OrderSearchResponse,
    OrderSummaryResponse, OrderWithQuantitiesResponse, ProductQuantityResponse, ProductResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session::SESSION_COOKIE_NAME;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Orders backend API",
        description = "Customer directory, product catalog and order management for a delivery business."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::current_account,
        crate::inbound::http::auth::logout,
        crate::inbound::http::products::list_products,
        crate::inbound::http::customers::list_customers,
        crate::inbound::http::customers::get_customer,
        crate::inbound::http::customers::create_customer,
        crate::inbound::http::customers::update_customer,
        crate::inbound::http::customers::delete_customer,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::blank_order,
        crate::inbound::http::orders::search_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::get_order_items,
        crate::inbound::http::orders::get_order_details,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::create_mobile_order,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::order_items::list_items,
        crate::inbound::http::order_items::get_item,
        crate::inbound::http::order_items::create_item,
        crate::inbound::http::order_items::update_item,
        crate::inbound::http::order_items::delete_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        AccountResponse,
        CustomerRequest,
        CustomerResponse,
        ProductResponse,
        ItemRequest,
        ItemResourceRequest,
        OrderRequest,
        MobileOrderRequest,
        OrderItemResponse,
        OrderResponse,
        OrderSummaryResponse,
        ProductQuantityResponse,
        OrderWithQuantitiesResponse,
        OrderSearchResponse,
        ItemRecordResponse,
    )),
    tags(
        (name = "auth", description = "Back-office login and session"),
        (name = "products", description = "Fixed product catalog"),
        (name = "customers", description = "Customer directory"),
        (name = "orders", description = "Order creation, reconciliation and search"),
        (name = "order-items", description = "Individual order items"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
