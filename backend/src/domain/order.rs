//! Order aggregate and total calculation.
//!
//! An [`Order`] is the aggregate root: it owns its [`OrderItem`]s outright
//! and holds a non-owning copy of the customer it belongs to. Derived money
//! fields (item subtotals and the order total) are recomputed explicitly via
//! [`Order::recompute_total`] at every mutation boundary.
//!
//! ## Invariants
//! - `item.subtotal == item.unit_price * item.quantity` after recomputation.
//! - `order.total == Σ item.subtotal + delivery_fee.unwrap_or(0)` after
//!   recomputation.
//! - At most one item per product code within an order.
//! - No amount exceeds [`MAX_AMOUNT`], the largest value a `NUMERIC(12,2)`
//!   column holds. Recomputation fails with [`AmountOverflowError`] instead.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Customer, Product};

/// Largest money amount that can be stored: `9 999 999 999.99`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Money amounts are stored with this many decimal places.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest item quantity that can be stored (`INTEGER` column).
pub const MAX_QUANTITY: u32 = 2_147_483_647;

/// A subtotal or total would exceed [`MAX_AMOUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("amount exceeds the maximum of {MAX_AMOUNT}")]
pub struct AmountOverflowError;

fn bounded(amount: Option<Decimal>) -> Result<Decimal, AmountOverflowError> {
    amount
        .filter(|value| *value <= MAX_AMOUNT)
        .ok_or(AmountOverflowError)
}

/// Database identifier of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier of an order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItemId(i64);

impl OrderItemId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Submitted line item before it is attached to an order.
///
/// `unit_price` is optional; the catalog price is used when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemDraft {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Option<Decimal>,
}

impl OrderItemDraft {
    /// Draft priced at the catalog price.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            product,
            quantity,
            unit_price: None,
        }
    }

    /// Explicit unit price, falling back to the catalog.
    pub fn resolved_unit_price(&self) -> Decimal {
        self.unit_price.unwrap_or_else(|| self.product.unit_price())
    }
}

/// One product line within an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    /// `None` until the item has been persisted.
    pub id: Option<OrderItemId>,
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl OrderItem {
    /// Build an unsaved item from a draft, defaulting the unit price from the
    /// catalog and computing the subtotal.
    ///
    /// # Errors
    /// [`AmountOverflowError`] when the subtotal is not storable.
    pub fn from_draft(draft: &OrderItemDraft) -> Result<Self, AmountOverflowError> {
        let mut item = Self {
            id: None,
            product: draft.product,
            quantity: draft.quantity,
            unit_price: draft.resolved_unit_price(),
            subtotal: Decimal::ZERO,
        };
        item.recompute_subtotal()?;
        Ok(item)
    }

    /// Zero-quantity placeholder priced from the catalog.
    pub fn placeholder(product: Product) -> Self {
        Self {
            id: None,
            product,
            quantity: 0,
            unit_price: product.unit_price(),
            subtotal: Decimal::ZERO,
        }
    }

    /// Recompute `subtotal = unit_price * quantity`.
    ///
    /// # Errors
    /// [`AmountOverflowError`] when the product exceeds [`MAX_AMOUNT`]. The
    /// stored subtotal is left untouched.
    pub fn recompute_subtotal(&mut self) -> Result<Decimal, AmountOverflowError> {
        self.subtotal = bounded(self.unit_price.checked_mul(Decimal::from(self.quantity)))?;
        Ok(self.subtotal)
    }

    /// Whether the item counts towards the order (quantity above zero).
    pub fn is_present(&self) -> bool {
        self.quantity > 0
    }
}

/// Order aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// `None` until the order has been persisted.
    pub id: Option<OrderId>,
    /// `None` once the customer has been deleted from the directory.
    pub customer: Option<Customer>,
    pub items: Vec<OrderItem>,
    pub delivery_at: Option<NaiveDateTime>,
    pub delivery_fee: Option<Decimal>,
    pub total: Decimal,
}

impl Order {
    /// Build an unsaved order from drafts with its total already computed.
    ///
    /// # Errors
    /// [`AmountOverflowError`] when a subtotal or the total is not storable.
    pub fn from_drafts(
        items: &[OrderItemDraft],
        delivery_at: Option<NaiveDateTime>,
        delivery_fee: Option<Decimal>,
    ) -> Result<Self, AmountOverflowError> {
        let mut order = Self {
            id: None,
            customer: None,
            items: items
                .iter()
                .map(OrderItem::from_draft)
                .collect::<Result<_, _>>()?,
            delivery_at,
            delivery_fee,
            total: Decimal::ZERO,
        };
        order.recompute_total()?;
        Ok(order)
    }

    /// Unsaved order listing every catalog product at quantity zero.
    pub fn blank() -> Self {
        let mut order = Self {
            id: None,
            customer: None,
            items: Vec::new(),
            delivery_at: None,
            delivery_fee: None,
            total: Decimal::ZERO,
        };
        order.fill_missing_items();
        order
    }

    /// Recompute every item subtotal and the order total.
    ///
    /// Idempotent: calling it twice without intervening mutation yields the
    /// same total.
    ///
    /// # Examples
    /// ```
    /// use orders_backend::domain::{Order, OrderItemDraft, Product};
    /// use rust_decimal::Decimal;
    ///
    /// # fn main() -> Result<(), orders_backend::domain::AmountOverflowError> {
    /// let mut order = Order::from_drafts(
    ///     &[OrderItemDraft::new(Product::Tempero, 2)],
    ///     None,
    ///     Some(Decimal::new(500, 2)),
    /// )?;
    /// assert_eq!(order.recompute_total()?, Decimal::new(1100, 2));
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// [`AmountOverflowError`] when a subtotal or the total exceeds
    /// [`MAX_AMOUNT`]; the total keeps its previous value.
    pub fn recompute_total(&mut self) -> Result<Decimal, AmountOverflowError> {
        let fee = self.delivery_fee.unwrap_or(Decimal::ZERO);
        let total = self.items.iter_mut().try_fold(fee, |sum, item| {
            let subtotal = item.recompute_subtotal()?;
            bounded(sum.checked_add(subtotal))
        })?;
        self.total = bounded(Some(total))?;
        Ok(self.total)
    }

    /// Append a zero-quantity item for every catalog product the order does
    /// not already contain. Placeholders add nothing, so the total is kept.
    pub fn fill_missing_items(&mut self) {
        for product in Product::list_all() {
            if self.item_for(*product).is_none() {
                self.items.push(OrderItem::placeholder(*product));
            }
        }
    }

    /// Item holding `product`, if any.
    pub fn item_for(&self, product: Product) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.product == product)
    }

    /// Item with the given id, if any.
    pub fn item_by_id(&self, id: OrderItemId) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id == Some(id))
    }

    /// Items with a quantity above zero.
    pub fn present_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|item| item.is_present())
    }

    /// Drop zero-quantity items from the view. The total is unaffected.
    pub fn without_empty_items(mut self) -> Self {
        self.items.retain(OrderItem::is_present);
        self
    }

    /// Whether the order contains `product` with a quantity above zero.
    pub fn contains_product(&self, product: Product) -> bool {
        self.present_items().any(|item| item.product == product)
    }

    /// Human-readable item summary such as `"Tempero Supreme x2, Filé + Tiras x1"`,
    /// or `"-"` when the order has no items.
    pub fn items_summary(&self) -> String {
        let parts: Vec<String> = self
            .present_items()
            .map(|item| format!("{} x{}", item.product.description(), item.quantity))
            .collect();
        if parts.is_empty() {
            "-".to_owned()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn draft(product: Product, quantity: u32, unit_price: Option<Decimal>) -> OrderItemDraft {
        OrderItemDraft {
            product,
            quantity,
            unit_price,
        }
    }

    #[rstest]
    #[case(None, dec!(107.80))]
    #[case(Some(dec!(0)), dec!(107.80))]
    #[case(Some(dec!(7.50)), dec!(115.30))]
    fn total_adds_delivery_fee(#[case] fee: Option<Decimal>, #[case] expected: Decimal) {
        let order =
            Order::from_drafts(&[draft(Product::File, 2, None)], None, fee).expect("order");
        assert_eq!(order.total, expected);
    }

    #[rstest]
    fn explicit_unit_price_overrides_catalog() {
        let order = Order::from_drafts(&[draft(Product::Tiras, 3, Some(dec!(20)))], None, None)
            .expect("order");
        let item = order.item_for(Product::Tiras).expect("item");
        assert_eq!(item.unit_price, dec!(20));
        assert_eq!(item.subtotal, dec!(60));
        assert_eq!(order.total, dec!(60));
    }

    #[rstest]
    fn recompute_total_is_idempotent() {
        let mut order = Order::from_drafts(
            &[draft(Product::File, 1, None), draft(Product::Tempero, 4, None)],
            None,
            Some(dec!(5)),
        )
        .expect("order");
        let first = order.recompute_total().expect("total");
        let second = order.recompute_total().expect("total");
        assert_eq!(first, second);
        assert_eq!(first, dec!(70.90));
    }

    #[rstest]
    fn recompute_total_refreshes_stale_subtotals() {
        let mut order =
            Order::from_drafts(&[draft(Product::Combo, 1, None)], None, None).expect("order");
        if let Some(item) = order.items.first_mut() {
            item.quantity = 2;
        }
        assert_eq!(order.recompute_total().expect("total"), dec!(103.80));
        assert_eq!(order.items.first().map(|i| i.subtotal), Some(dec!(103.80)));
    }

    #[rstest]
    fn fill_missing_items_pads_catalog_without_changing_total() {
        let mut order =
            Order::from_drafts(&[draft(Product::Combo, 1, None)], None, Some(dec!(2)))
                .expect("order");
        let before = order.total;

        order.fill_missing_items();

        assert_eq!(order.items.len(), Product::ALL.len());
        assert_eq!(order.total, before);
        assert_eq!(order.item_for(Product::Combo).map(|i| i.quantity), Some(1));
        let padded = order.item_for(Product::File).expect("padded item");
        assert_eq!(padded.quantity, 0);
        assert_eq!(padded.unit_price, Product::File.unit_price());
    }

    #[rstest]
    fn blank_order_lists_catalog_at_zero() {
        let order = Order::blank();
        assert_eq!(order.items.len(), Product::ALL.len());
        assert!(order.items.iter().all(|item| item.quantity == 0));
        assert_eq!(order.total, Decimal::ZERO);
        assert!(order.id.is_none());
    }

    #[rstest]
    fn items_summary_lists_present_items() {
        let order = Order::from_drafts(
            &[
                draft(Product::Tempero, 2, None),
                draft(Product::File, 0, None),
                draft(Product::Combo, 1, None),
            ],
            None,
            None,
        )
        .expect("order");
        assert_eq!(order.items_summary(), "Tempero Supreme x2, Filé + Tiras x1");
    }

    #[rstest]
    fn items_summary_is_dash_when_empty() {
        assert_eq!(Order::blank().items_summary(), "-");
    }

    #[rstest]
    fn without_empty_items_hides_zero_quantities() {
        let order = Order::from_drafts(
            &[draft(Product::File, 0, None), draft(Product::Tiras, 1, None)],
            None,
            None,
        )
        .expect("order")
        .without_empty_items();
        assert_eq!(order.items.len(), 1);
        assert!(order.contains_product(Product::Tiras));
        assert!(!order.contains_product(Product::File));
    }

    #[rstest]
    fn storage_limits_match_the_column_types() {
        assert_eq!(MAX_AMOUNT, dec!(9999999999.99));
        assert_eq!(MAX_AMOUNT.scale(), AMOUNT_SCALE);
        assert_eq!(i32::try_from(MAX_QUANTITY).ok(), Some(i32::MAX));
    }

    #[rstest]
    #[case(Decimal::MAX, 10)]
    #[case(dec!(10000000000000000000000000000), 10)]
    #[case(dec!(1000000000), 10)]
    fn oversized_subtotal_is_rejected(#[case] unit_price: Decimal, #[case] quantity: u32) {
        let result =
            Order::from_drafts(&[draft(Product::File, quantity, Some(unit_price))], None, None);
        assert_eq!(result, Err(AmountOverflowError));
    }

    #[rstest]
    fn oversized_total_is_rejected() {
        let half = dec!(6000000000);
        let result = Order::from_drafts(
            &[draft(Product::File, 1, Some(half)), draft(Product::Tiras, 1, Some(half))],
            None,
            None,
        );
        assert_eq!(result, Err(AmountOverflowError));
    }

    #[rstest]
    fn delivery_fee_counts_towards_the_limit() {
        let result = Order::from_drafts(
            &[draft(Product::File, 1, Some(MAX_AMOUNT))],
            None,
            Some(dec!(0.01)),
        );
        assert_eq!(result, Err(AmountOverflowError));
    }

    #[rstest]
    fn failed_recompute_keeps_previous_total() {
        let mut order =
            Order::from_drafts(&[draft(Product::Combo, 1, None)], None, None).expect("order");
        if let Some(item) = order.items.first_mut() {
            item.unit_price = Decimal::MAX;
            item.quantity = 10;
        }

        assert_eq!(order.recompute_total(), Err(AmountOverflowError));
        assert_eq!(order.total, dec!(51.90));
    }

    #[rstest]
    fn largest_storable_total_is_accepted() {
        let order = Order::from_drafts(&[draft(Product::File, 1, Some(MAX_AMOUNT))], None, None)
            .expect("order");
        assert_eq!(order.total, MAX_AMOUNT);
    }
}
