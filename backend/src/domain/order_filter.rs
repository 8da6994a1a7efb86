//! Order search filters and read-model projections.
//!
//! Filters are optional predicates combined with logical AND. A product
//! filter switches the projection: without one, results are
//! [`OrderSummary`] rows; with one, only orders holding that product survive
//! and each result nests the item quantities ([`OrderWithQuantities`]).

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::{Order, OrderId, Product};

/// Optional search criteria. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub product: Option<String>,
    pub delivery_from: Option<NaiveDateTime>,
    pub delivery_to: Option<NaiveDateTime>,
}

/// Item line shown in an order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemLine {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Summary projection of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub id: Option<OrderId>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub delivery_at: Option<NaiveDateTime>,
    pub delivery_fee: Option<Decimal>,
    pub total: Decimal,
    pub items: Vec<OrderItemLine>,
    pub items_summary: String,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer.as_ref().map(|c| c.name.to_string()),
            phone: order.customer.as_ref().map(|c| c.phone.to_string()),
            address: order.customer.as_ref().map(|c| c.address.to_string()),
            delivery_at: order.delivery_at,
            delivery_fee: order.delivery_fee,
            total: order.total,
            items: order
                .present_items()
                .map(|item| OrderItemLine {
                    product: item.product,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    subtotal: item.subtotal,
                })
                .collect(),
            items_summary: order.items_summary(),
        }
    }
}

/// Product and quantity pair nested in product-filtered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuantity {
    pub product: Product,
    pub quantity: u32,
}

/// Product-filtered projection of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithQuantities {
    pub id: Option<OrderId>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub delivery_at: Option<NaiveDateTime>,
    pub delivery_fee: Option<Decimal>,
    pub items: Vec<ProductQuantity>,
}

impl From<&Order> for OrderWithQuantities {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer.as_ref().map(|c| c.name.to_string()),
            phone: order.customer.as_ref().map(|c| c.phone.to_string()),
            delivery_at: order.delivery_at,
            delivery_fee: order.delivery_fee,
            items: order
                .present_items()
                .map(|item| ProductQuantity {
                    product: item.product,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Search output; the variant depends on whether a product filter applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSearchResult {
    Summaries(Vec<OrderSummary>),
    WithQuantities(Vec<OrderWithQuantities>),
}

impl OrderSearchResult {
    /// Number of matching orders.
    pub fn len(&self) -> usize {
        match self {
            Self::Summaries(rows) => rows.len(),
            Self::WithQuantities(rows) => rows.len(),
        }
    }

    /// Whether no order matched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|value| value.to_lowercase().contains(needle))
}

impl OrderFilter {
    fn matches_name(&self, order: &Order) -> bool {
        match non_blank(self.customer_name.as_deref()) {
            Some(needle) => contains_ignore_case(
                order.customer.as_ref().map(|c| c.name.as_ref()),
                &needle,
            ),
            None => true,
        }
    }

    fn matches_phone(&self, order: &Order) -> bool {
        match non_blank(self.phone.as_deref()) {
            Some(needle) => contains_ignore_case(
                order.customer.as_ref().map(|c| c.phone.as_ref()),
                &needle,
            ),
            None => true,
        }
    }

    /// Inclusive range; applies only when both bounds are present.
    fn matches_delivery_range(&self, order: &Order) -> bool {
        match (self.delivery_from, self.delivery_to) {
            (Some(from), Some(to)) => order
                .delivery_at
                .is_some_and(|at| from <= at && at <= to),
            _ => true,
        }
    }

    fn matches(&self, order: &Order) -> bool {
        self.matches_name(order) && self.matches_phone(order) && self.matches_delivery_range(order)
    }

    /// Apply the filter to `orders`, preserving their order.
    ///
    /// An unknown product code yields an empty result rather than an error.
    ///
    /// # Examples
    /// ```
    /// use orders_backend::domain::{OrderFilter, OrderSearchResult};
    ///
    /// let filter = OrderFilter {
    ///     product: Some("UNKNOWN".into()),
    ///     ..OrderFilter::default()
    /// };
    /// assert!(filter.apply(&[]).is_empty());
    /// ```
    pub fn apply(&self, orders: &[Order]) -> OrderSearchResult {
        let basic = orders.iter().filter(|order| self.matches(order));
        let product = self
            .product
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());

        match product {
            None => OrderSearchResult::Summaries(basic.map(OrderSummary::from).collect()),
            Some(code) => match Product::lookup(code) {
                Ok(product) => OrderSearchResult::WithQuantities(
                    basic
                        .filter(|order| order.contains_product(product))
                        .map(OrderWithQuantities::from)
                        .collect(),
                ),
                Err(_) => OrderSearchResult::WithQuantities(Vec::new()),
            },
        }
    }
}
