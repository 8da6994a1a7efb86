//! Order item sub-resource handlers.
//!
//! ```text
//! GET    /api/itens
//! GET    /api/itens/{id}
//! POST   /api/itens {"orderId":4,"product":"TEMPERO","quantity":2}
//! PUT    /api/itens/{id}
//! DELETE /api/itens/{id}
//! ```
//!
//! Every mutation goes through the parent order so its stored total stays
//! in step with its items.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::order_service::item_not_found;
use crate::domain::{OrderId, OrderItemId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ItemRecordResponse, ItemResourceRequest};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ORDER_ID, require};

const ITEM_REMOVED: &str = "Itens do pedido removidos com sucesso!";

/// Every stored item across all orders.
#[utoipa::path(
    get,
    path = "/api/itens",
    responses((status = 200, description = "Stored items", body = [ItemRecordResponse])),
    tags = ["order-items"],
    operation_id = "listOrderItems"
)]
#[get("/itens")]
pub async fn list_items(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ItemRecordResponse>>> {
    let items = state.orders_query.list_items().await?;
    Ok(web::Json(
        items.into_iter().map(ItemRecordResponse::from).collect(),
    ))
}

/// One stored item.
#[utoipa::path(
    get,
    path = "/api/itens/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item", body = ItemRecordResponse),
        (status = 404, description = "Unknown item", body = ErrorSchema)
    ),
    tags = ["order-items"],
    operation_id = "getOrderItem"
)]
#[get("/itens/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ItemRecordResponse>> {
    let id = OrderItemId::new(path.into_inner());
    let record = state
        .orders_query
        .find_item(id)
        .await?
        .ok_or_else(|| item_not_found(id))?;
    Ok(web::Json(ItemRecordResponse::from(record)))
}

/// Add an item to an order.
#[utoipa::path(
    post,
    path = "/api/itens",
    request_body = ItemResourceRequest,
    responses(
        (status = 201, description = "Item added", body = ItemRecordResponse),
        (status = 400, description = "Invalid payload or product already on the order", body = ErrorSchema),
        (status = 404, description = "Unknown order", body = ErrorSchema)
    ),
    tags = ["order-items"],
    operation_id = "createOrderItem"
)]
#[post("/itens")]
pub async fn create_item(
    state: web::Data<HttpState>,
    payload: web::Json<ItemResourceRequest>,
) -> ApiResult<HttpResponse> {
    let ItemResourceRequest { order_id, item } = payload.into_inner();
    let order_id = OrderId::new(require(order_id, ORDER_ID)?);
    let draft = item.into_draft(None)?;
    let record = state.order_items.add_item(order_id, draft).await?;
    Ok(HttpResponse::Created().json(ItemRecordResponse::from(record)))
}

/// Change an item's product, quantity or unit price.
#[utoipa::path(
    put,
    path = "/api/itens/{id}",
    params(("id" = i64, Path, description = "Item id")),
    request_body = ItemResourceRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemRecordResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 404, description = "Unknown item", body = ErrorSchema)
    ),
    tags = ["order-items"],
    operation_id = "updateOrderItem"
)]
#[put("/itens/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<ItemResourceRequest>,
) -> ApiResult<web::Json<ItemRecordResponse>> {
    let draft = payload.into_inner().item.into_draft(None)?;
    let record = state
        .order_items
        .update_item(OrderItemId::new(path.into_inner()), draft)
        .await?;
    Ok(web::Json(ItemRecordResponse::from(record)))
}

/// Remove an item from its order.
#[utoipa::path(
    delete,
    path = "/api/itens/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Confirmation text", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown item", body = ErrorSchema)
    ),
    tags = ["order-items"],
    operation_id = "deleteOrderItem"
)]
#[delete("/itens/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .order_items
        .remove_item(OrderItemId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(ITEM_REMOVED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::ports::{MockOrderItemCommand, MockOrderQuery, OrderItemRecord};
    use crate::domain::{OrderItem, OrderItemDraft, Product};
    use crate::inbound::http::state::HttpStatePorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    fn record(order: i64, item: i64, product: Product, quantity: u32) -> OrderItemRecord {
        let mut stored =
            OrderItem::from_draft(&OrderItemDraft::new(product, quantity)).expect("item");
        stored.id = Some(OrderItemId::new(item));
        OrderItemRecord {
            order_id: OrderId::new(order),
            item: stored,
        }
    }

    fn test_app(
        query: MockOrderQuery,
        command: MockOrderItemCommand,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(HttpStatePorts {
            orders_query: Arc::new(query),
            order_items: Arc::new(command),
            ..HttpStatePorts::default()
        });
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api")
                .service(list_items)
                .service(get_item)
                .service(create_item)
                .service(update_item)
                .service(delete_item),
        )
    }

    #[actix_web::test]
    async fn list_flattens_items_with_order_ids() {
        let mut query = MockOrderQuery::new();
        query.expect_list_items().return_once(|| {
            Ok(vec![
                record(1, 10, Product::File, 1),
                record(2, 11, Product::Tempero, 3),
            ])
        });
        let app = actix_test::init_service(test_app(query, MockOrderItemCommand::new())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/itens").to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.pointer("/1/orderId").and_then(Value::as_i64), Some(2));
        assert_eq!(body.pointer("/1/id").and_then(Value::as_i64), Some(11));
        assert_eq!(body.pointer("/1/subtotal"), Some(&json!(9.0)));
    }

    #[actix_web::test]
    async fn unknown_item_is_not_found() {
        let mut query = MockOrderQuery::new();
        query.expect_find_item().return_once(|_| Ok(None));
        let app = actix_test::init_service(test_app(query, MockOrderItemCommand::new())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/itens/5").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_requires_order_id() {
        let app = actix_test::init_service(test_app(
            MockOrderQuery::new(),
            MockOrderItemCommand::new(),
        ))
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/itens")
                .set_json(json!({"product": "FILE", "quantity": 1}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("orderId")
        );
    }

    #[actix_web::test]
    async fn create_adds_item_to_order() {
        let mut command = MockOrderItemCommand::new();
        command
            .expect_add_item()
            .withf(|order, draft| {
                *order == OrderId::new(4) && draft.product == Product::Tempero && draft.quantity == 2
            })
            .return_once(|_, _| Ok(record(4, 44, Product::Tempero, 2)));
        let app = actix_test::init_service(test_app(MockOrderQuery::new(), command)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/itens")
                .set_json(json!({"pedidoId": 4, "produto": "TEMPERO", "quantidade": 2}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn update_passes_path_id() {
        let mut command = MockOrderItemCommand::new();
        command
            .expect_update_item()
            .withf(|id, _| *id == OrderItemId::new(44))
            .return_once(|_, _| Ok(record(4, 44, Product::Combo, 1)));
        let app = actix_test::init_service(test_app(MockOrderQuery::new(), command)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/itens/44")
                .set_json(json!({"product": "COMBO", "quantity": 1}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("product").and_then(Value::as_str), Some("COMBO"));
    }

    #[actix_web::test]
    async fn delete_returns_confirmation() {
        let mut command = MockOrderItemCommand::new();
        command.expect_remove_item().return_once(|_| Ok(()));
        let app = actix_test::init_service(test_app(MockOrderQuery::new(), command)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete().uri("/api/itens/44").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        assert_eq!(body.as_ref(), ITEM_REMOVED.as_bytes());
    }
}
