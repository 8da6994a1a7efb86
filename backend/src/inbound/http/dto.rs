//! Request and response bodies for the order-management endpoints.
//!
//! Requests keep every field optional so missing values surface as
//! structured `missing_field` errors rather than opaque deserialisation
//! failures. Request fields also accept the Portuguese names used by the
//! existing web and mobile clients (`nome`, `telefone`, `itens`, ...).
//! Money is exchanged as JSON numbers.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::OrderItemRecord;
use crate::domain::{
    Customer, CustomerId, CustomerReference, Error, Order, OrderItem, OrderItemDraft,
    OrderItemLine, OrderSearchResult, OrderSubmission, OrderSummary, OrderWithQuantities,
    Product, ProductQuantity,
};
use crate::inbound::http::validation::{
    DELIVERY_AT, DELIVERY_FEE, PRODUCT, QUANTITY, UNIT_PRICE, non_negative_amount,
    parse_customer_details, parse_optional_datetime, parse_product, parse_quantity, require,
};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Customer fields, used both for `/api/clientes` bodies and embedded in
/// order payloads.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    /// Directory id; only meaningful inside an order update.
    pub id: Option<i64>,
    #[serde(alias = "nome")]
    #[schema(example = "Ana Souza")]
    pub name: Option<String>,
    #[serde(alias = "telefone")]
    #[schema(example = "11999990000")]
    pub phone: Option<String>,
    #[serde(alias = "endereco")]
    #[schema(example = "Rua das Flores, 10")]
    pub address: Option<String>,
}

/// One submitted order line.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    #[serde(alias = "produto")]
    #[schema(example = "FILE")]
    pub product: Option<String>,
    #[serde(alias = "quantidade")]
    #[schema(example = 2)]
    pub quantity: Option<i64>,
    #[serde(alias = "precoUnitario")]
    #[schema(value_type = Option<f64>, example = 53.9)]
    pub unit_price: Option<Decimal>,
}

/// Full order payload for `POST /api/pedidos` and `PUT /api/pedidos/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(alias = "cliente")]
    pub customer: Option<CustomerRequest>,
    /// ISO-8601 local date-time, e.g. `2024-01-10T12:00:00`.
    #[serde(alias = "dataEntrega")]
    pub delivery_at: Option<String>,
    #[serde(alias = "taxaEntrega")]
    #[schema(value_type = Option<f64>, example = 5.0)]
    pub delivery_fee: Option<Decimal>,
    #[serde(alias = "itens", default)]
    pub items: Vec<ItemRequest>,
}

/// Simplified draft sent by the mobile client to `POST /api/pedidos/mobile`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MobileOrderRequest {
    #[serde(alias = "nome")]
    pub name: Option<String>,
    #[serde(alias = "telefone")]
    pub phone: Option<String>,
    #[serde(alias = "endereco")]
    pub address: Option<String>,
    #[serde(alias = "dataEntrega")]
    pub delivery_at: Option<String>,
    #[serde(alias = "taxaEntrega")]
    #[schema(value_type = Option<f64>)]
    pub delivery_fee: Option<Decimal>,
    #[serde(alias = "itens", default)]
    pub items: Vec<ItemRequest>,
}

/// Body for the `/api/itens` sub-resource.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResourceRequest {
    /// Parent order; required on create, ignored on update.
    #[serde(alias = "pedidoId")]
    pub order_id: Option<i64>,
    #[serde(flatten)]
    pub item: ItemRequest,
}

impl ItemRequest {
    /// Validate into a draft. `index` locates the item inside a list.
    pub(crate) fn into_draft(self, index: Option<usize>) -> Result<OrderItemDraft, Error> {
        let code = require(self.product, PRODUCT)?;
        let product = parse_product(&code, PRODUCT, index)?;
        let quantity = parse_quantity(require(self.quantity, QUANTITY)?, index)?;
        let unit_price = non_negative_amount(self.unit_price, UNIT_PRICE, index)?;
        Ok(OrderItemDraft {
            product,
            quantity,
            unit_price,
        })
    }
}

fn parse_items(items: Vec<ItemRequest>) -> Result<Vec<OrderItemDraft>, Error> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.into_draft(Some(index)))
        .collect()
}

impl CustomerRequest {
    fn into_reference(self) -> Result<CustomerReference, Error> {
        Ok(CustomerReference {
            id: self.id.map(CustomerId::new),
            details: parse_customer_details(self.name, self.phone, self.address)?,
        })
    }
}

impl TryFrom<OrderRequest> for OrderSubmission {
    type Error = Error;

    fn try_from(value: OrderRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            customer: value
                .customer
                .map(CustomerRequest::into_reference)
                .transpose()?,
            delivery_at: parse_optional_datetime(value.delivery_at.as_deref(), DELIVERY_AT)?,
            delivery_fee: non_negative_amount(value.delivery_fee, DELIVERY_FEE, None)?,
            items: parse_items(value.items)?,
        })
    }
}

impl TryFrom<MobileOrderRequest> for OrderSubmission {
    type Error = Error;

    fn try_from(value: MobileOrderRequest) -> Result<Self, Self::Error> {
        let details = parse_customer_details(value.name, value.phone, value.address)?;
        Ok(Self {
            customer: Some(CustomerReference { id: None, details }),
            delivery_at: parse_optional_datetime(value.delivery_at.as_deref(), DELIVERY_AT)?,
            delivery_fee: non_negative_amount(value.delivery_fee, DELIVERY_FEE, None)?,
            items: parse_items(value.items)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Customer as returned by the directory.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into(),
            phone: value.phone.into(),
            address: value.address.into(),
            created_at: value.created_at,
        }
    }
}

/// Catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(example = "FILE")]
    pub code: String,
    #[schema(example = "Filé de Tilápia - 1kg")]
    pub description: String,
    #[schema(value_type = f64, example = 53.9)]
    pub unit_price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        Self {
            code: value.code().to_owned(),
            description: value.description().to_owned(),
            unit_price: value.unit_price(),
        }
    }
}

/// Order line with its computed subtotal.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    /// Absent for unsaved rows (blank templates and padded grids).
    pub id: Option<i64>,
    pub product: String,
    pub description: String,
    pub quantity: u32,
    #[schema(value_type = f64)]
    pub unit_price: Decimal,
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(value: &OrderItem) -> Self {
        Self {
            id: value.id.map(|id| id.get()),
            product: value.product.code().to_owned(),
            description: value.product.description().to_owned(),
            quantity: value.quantity,
            unit_price: value.unit_price,
            subtotal: value.subtotal,
        }
    }
}

impl From<&OrderItemLine> for OrderItemResponse {
    fn from(value: &OrderItemLine) -> Self {
        Self {
            id: None,
            product: value.product.code().to_owned(),
            description: value.product.description().to_owned(),
            quantity: value.quantity,
            unit_price: value.unit_price,
            subtotal: value.subtotal,
        }
    }
}

/// Full order with its customer and items.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Option<i64>,
    /// Absent when the customer was deleted from the directory.
    pub customer: Option<CustomerResponse>,
    pub delivery_at: Option<NaiveDateTime>,
    #[schema(value_type = Option<f64>)]
    pub delivery_fee: Option<Decimal>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub items: Vec<OrderItemResponse>,
}

impl From<Order> for OrderResponse {
    fn from(value: Order) -> Self {
        Self {
            id: value.id.map(|id| id.get()),
            items: value.items.iter().map(OrderItemResponse::from).collect(),
            customer: value.customer.map(CustomerResponse::from),
            delivery_at: value.delivery_at,
            delivery_fee: value.delivery_fee,
            total: value.total,
        }
    }
}

/// Listing row for `GET /api/pedidos` and unfiltered searches.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryResponse {
    pub id: Option<i64>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub delivery_at: Option<NaiveDateTime>,
    #[schema(value_type = Option<f64>)]
    pub delivery_fee: Option<Decimal>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub items: Vec<OrderItemResponse>,
    #[schema(example = "Filé de Tilápia - 1kg x2")]
    pub items_summary: String,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(value: OrderSummary) -> Self {
        Self {
            id: value.id.map(|id| id.get()),
            items: value.items.iter().map(OrderItemResponse::from).collect(),
            customer_name: value.customer_name,
            phone: value.phone,
            address: value.address,
            delivery_at: value.delivery_at,
            delivery_fee: value.delivery_fee,
            total: value.total,
            items_summary: value.items_summary,
        }
    }
}

/// Product and quantity nested in product-filtered search results.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuantityResponse {
    pub product: String,
    pub quantity: u32,
}

impl From<ProductQuantity> for ProductQuantityResponse {
    fn from(value: ProductQuantity) -> Self {
        Self {
            product: value.product.code().to_owned(),
            quantity: value.quantity,
        }
    }
}

/// Search row returned when a product filter is present.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithQuantitiesResponse {
    pub id: Option<i64>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub delivery_at: Option<NaiveDateTime>,
    #[schema(value_type = Option<f64>)]
    pub delivery_fee: Option<Decimal>,
    pub items: Vec<ProductQuantityResponse>,
}

impl From<OrderWithQuantities> for OrderWithQuantitiesResponse {
    fn from(value: OrderWithQuantities) -> Self {
        Self {
            id: value.id.map(|id| id.get()),
            customer_name: value.customer_name,
            phone: value.phone,
            delivery_at: value.delivery_at,
            delivery_fee: value.delivery_fee,
            items: value
                .items
                .into_iter()
                .map(ProductQuantityResponse::from)
                .collect(),
        }
    }
}

/// Search output; the row shape depends on the product filter.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum OrderSearchResponse {
    Summaries(Vec<OrderSummaryResponse>),
    WithQuantities(Vec<OrderWithQuantitiesResponse>),
}

impl From<OrderSearchResult> for OrderSearchResponse {
    fn from(value: OrderSearchResult) -> Self {
        match value {
            OrderSearchResult::Summaries(rows) => {
                Self::Summaries(rows.into_iter().map(OrderSummaryResponse::from).collect())
            }
            OrderSearchResult::WithQuantities(rows) => Self::WithQuantities(
                rows.into_iter()
                    .map(OrderWithQuantitiesResponse::from)
                    .collect(),
            ),
        }
    }
}

/// Stored item with its parent order id.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecordResponse {
    pub order_id: i64,
    #[serde(flatten)]
    pub item: OrderItemResponse,
}

impl From<OrderItemRecord> for ItemRecordResponse {
    fn from(value: OrderItemRecord) -> Self {
        Self {
            order_id: value.order_id.get(),
            item: OrderItemResponse::from(&value.item),
        }
    }
}
