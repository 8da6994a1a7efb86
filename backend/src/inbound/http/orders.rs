//! Order handlers.
//!
//! ```text
//! GET    /api/pedidos
//! GET    /api/pedidos/novo
//! GET    /api/pedidos/buscar?cliente=&telefone=&produto=&inicio=&fim=
//! GET    /api/pedidos/{id}
//! GET    /api/pedidos/{id}/itens
//! GET    /api/pedidos/{id}/detalhes
//! POST   /api/pedidos
//! POST   /api/pedidos/mobile
//! PUT    /api/pedidos/{id}
//! DELETE /api/pedidos/{id}
//! ```
//!
//! The literal routes (`novo`, `buscar`) must be registered before
//! `/pedidos/{id}`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::order_service::order_not_found;
use crate::domain::{Error, Order, OrderFilter, OrderId, OrderSubmission, OrderSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    MobileOrderRequest, OrderItemResponse, OrderRequest, OrderResponse, OrderSearchResponse,
    OrderSummaryResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_datetime};

const ORDER_REMOVED: &str = "Pedido removido com sucesso!";
const FROM: FieldName = FieldName::new("inicio");
const TO: FieldName = FieldName::new("fim");

/// Query string accepted by `GET /api/pedidos/buscar`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "cliente")]
    pub customer_name: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "produto")]
    pub product: Option<String>,
    #[serde(rename = "inicio")]
    pub from: Option<String>,
    #[serde(rename = "fim")]
    pub to: Option<String>,
}

impl TryFrom<SearchParams> for OrderFilter {
    type Error = Error;

    fn try_from(value: SearchParams) -> Result<Self, Self::Error> {
        Ok(Self {
            delivery_from: parse_optional_datetime(value.from.as_deref(), FROM)?,
            delivery_to: parse_optional_datetime(value.to.as_deref(), TO)?,
            customer_name: value.customer_name,
            phone: value.phone,
            product: value.product,
        })
    }
}

async fn load(state: &HttpState, id: OrderId) -> Result<Order, Error> {
    state
        .orders_query
        .find(id)
        .await?
        .ok_or_else(|| order_not_found(id))
}

/// Order summaries, newest delivery first.
#[utoipa::path(
    get,
    path = "/api/pedidos",
    responses(
        (status = 200, description = "Order summaries", body = [OrderSummaryResponse]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/pedidos")]
pub async fn list_orders(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<OrderSummaryResponse>>> {
    let orders = state.orders_query.list().await?;
    Ok(web::Json(
        orders
            .iter()
            .map(|order| OrderSummaryResponse::from(OrderSummary::from(order)))
            .collect(),
    ))
}

/// Unsaved order listing the whole catalog at quantity zero.
#[utoipa::path(
    get,
    path = "/api/pedidos/novo",
    responses((status = 200, description = "Blank order template", body = OrderResponse)),
    tags = ["orders"],
    operation_id = "blankOrder"
)]
#[get("/pedidos/novo")]
pub async fn blank_order() -> web::Json<OrderResponse> {
    web::Json(OrderResponse::from(Order::blank()))
}

/// Filtered order search.
///
/// Without `produto` the rows are order summaries; with it only orders
/// holding that product are returned, each with its item quantities.
#[utoipa::path(
    get,
    path = "/api/pedidos/buscar",
    params(
        ("cliente" = Option<String>, Query, description = "Case-insensitive customer name fragment"),
        ("telefone" = Option<String>, Query, description = "Case-insensitive phone fragment"),
        ("produto" = Option<String>, Query, description = "Exact product code"),
        ("inicio" = Option<String>, Query, description = "Delivery window start (ISO-8601 date-time)"),
        ("fim" = Option<String>, Query, description = "Delivery window end (ISO-8601 date-time)")
    ),
    responses(
        (status = 200, description = "Matching orders", body = OrderSearchResponse),
        (status = 400, description = "Malformed date", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "searchOrders"
)]
#[get("/pedidos/buscar")]
pub async fn search_orders(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<OrderSearchResponse>> {
    let filter = OrderFilter::try_from(params.into_inner())?;
    let result = state.orders_query.search(filter).await?;
    Ok(web::Json(OrderSearchResponse::from(result)))
}

/// One order with its customer and items.
#[utoipa::path(
    get,
    path = "/api/pedidos/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 404, description = "Unknown order", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/pedidos/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<OrderResponse>> {
    let order = load(&state, OrderId::new(path.into_inner())).await?;
    Ok(web::Json(OrderResponse::from(order)))
}

/// Items of one order.
#[utoipa::path(
    get,
    path = "/api/pedidos/{id}/itens",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order items", body = [OrderItemResponse]),
        (status = 404, description = "Unknown order", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "getOrderItems"
)]
#[get("/pedidos/{id}/itens")]
pub async fn get_order_items(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<OrderItemResponse>>> {
    let order = load(&state, OrderId::new(path.into_inner())).await?;
    Ok(web::Json(
        order.items.iter().map(OrderItemResponse::from).collect(),
    ))
}

/// Order padded with a zero-quantity row for every product it lacks.
#[utoipa::path(
    get,
    path = "/api/pedidos/{id}/detalhes",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with the full catalog grid", body = OrderResponse),
        (status = 404, description = "Unknown order", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "getOrderDetailGrid"
)]
#[get("/pedidos/{id}/detalhes")]
pub async fn get_order_details(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<OrderResponse>> {
    let id = OrderId::new(path.into_inner());
    let order = state
        .orders_query
        .detail_grid(id)
        .await?
        .ok_or_else(|| order_not_found(id))?;
    Ok(web::Json(OrderResponse::from(order)))
}

/// Create an order from the full payload.
#[utoipa::path(
    post,
    path = "/api/pedidos",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/pedidos")]
pub async fn create_order(
    state: web::Data<HttpState>,
    payload: web::Json<OrderRequest>,
) -> ApiResult<HttpResponse> {
    let submission = OrderSubmission::try_from(payload.into_inner())?;
    let order = state.orders.submit_new_order(submission).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// Create an order from the mobile client's simplified draft.
#[utoipa::path(
    post,
    path = "/api/pedidos/mobile",
    request_body = MobileOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "createMobileOrder"
)]
#[post("/pedidos/mobile")]
pub async fn create_mobile_order(
    state: web::Data<HttpState>,
    payload: web::Json<MobileOrderRequest>,
) -> ApiResult<HttpResponse> {
    let submission = OrderSubmission::try_from(payload.into_inner())?;
    let order = state.orders.submit_new_order(submission).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// Reconcile a stored order with a revised payload.
#[utoipa::path(
    put,
    path = "/api/pedidos/{id}",
    params(("id" = i64, Path, description = "Order id")),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order reconciled", body = OrderResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Unknown order", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[put("/pedidos/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<OrderRequest>,
) -> ApiResult<web::Json<OrderResponse>> {
    let submission = OrderSubmission::try_from(payload.into_inner())?;
    let order = state
        .orders
        .reconcile(OrderId::new(path.into_inner()), submission)
        .await?;
    Ok(web::Json(OrderResponse::from(order)))
}

/// Delete an order and its items.
#[utoipa::path(
    delete,
    path = "/api/pedidos/{id}",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Confirmation text", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown order", body = ErrorSchema)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/pedidos/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.orders.delete(OrderId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(ORDER_REMOVED))
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
