//! Customer directory handlers.
//!
//! ```text
//! GET    /api/clientes
//! GET    /api/clientes/{id}
//! POST   /api/clientes {"name":"Ana","phone":"11999990000","address":"Rua A"}
//! PUT    /api/clientes/{id}
//! DELETE /api/clientes/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::customer_service::customer_not_found;
use crate::domain::{CustomerDetails, CustomerId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CustomerRequest, CustomerResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_customer_details;

const CUSTOMER_REMOVED: &str = "Cliente removido com sucesso!";

fn parse_payload(payload: CustomerRequest) -> Result<CustomerDetails, Error> {
    parse_customer_details(payload.name, payload.phone, payload.address)
}

/// List every customer.
#[utoipa::path(
    get,
    path = "/api/clientes",
    responses(
        (status = 200, description = "Customers ordered by id", body = [CustomerResponse]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "listCustomers"
)]
#[get("/clientes")]
pub async fn list_customers(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CustomerResponse>>> {
    let customers = state.customers.list().await?;
    Ok(web::Json(
        customers.into_iter().map(CustomerResponse::from).collect(),
    ))
}

/// Fetch one customer.
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponse),
        (status = 404, description = "Unknown customer", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "getCustomer"
)]
#[get("/clientes/{id}")]
pub async fn get_customer(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CustomerResponse>> {
    let id = CustomerId::new(path.into_inner());
    let customer = state
        .customers
        .find_by_id(id)
        .await?
        .ok_or_else(|| customer_not_found(id))?;
    Ok(web::Json(CustomerResponse::from(customer)))
}

/// Register a customer.
#[utoipa::path(
    post,
    path = "/api/clientes",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Invalid payload or phone already registered", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "createCustomer"
)]
#[post("/clientes")]
pub async fn create_customer(
    state: web::Data<HttpState>,
    payload: web::Json<CustomerRequest>,
) -> ApiResult<HttpResponse> {
    let details = parse_payload(payload.into_inner())?;
    let customer = state.customers.create(details).await?;
    Ok(HttpResponse::Created().json(CustomerResponse::from(customer)))
}

/// Replace a customer's fields.
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Invalid payload or phone already registered", body = ErrorSchema),
        (status = 404, description = "Unknown customer", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "updateCustomer"
)]
#[put("/clientes/{id}")]
pub async fn update_customer(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<CustomerRequest>,
) -> ApiResult<web::Json<CustomerResponse>> {
    let details = parse_payload(payload.into_inner())?;
    let customer = state
        .customers
        .update(CustomerId::new(path.into_inner()), details)
        .await?;
    Ok(web::Json(CustomerResponse::from(customer)))
}

/// Remove a customer; its orders are kept without a customer.
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Confirmation text", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown customer", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "deleteCustomer"
)]
#[delete("/clientes/{id}")]
pub async fn delete_customer(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .customers
        .delete(CustomerId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(CUSTOMER_REMOVED))
}
