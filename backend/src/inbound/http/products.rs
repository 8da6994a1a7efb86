//! Catalog handler.
//!
//! ```text
//! GET /api/produtos
//! ```

use actix_web::{get, web};

use crate::domain::Product;
use crate::inbound::http::dto::ProductResponse;

/// List every catalog product with its code, description and unit price.
#[utoipa::path(
    get,
    path = "/api/produtos",
    responses((status = 200, description = "Catalog", body = [ProductResponse])),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/produtos")]
pub async fn list_products() -> web::Json<Vec<ProductResponse>> {
    web::Json(
        Product::list_all()
            .iter()
            .copied()
            .map(ProductResponse::from)
            .collect(),
    )
}
