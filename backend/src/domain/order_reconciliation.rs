//! Order reconciliation: merging a submitted order into a persisted one.
//!
//! Everything here is pure. Services load the persisted aggregate and the
//! matching customer, call into this module, then hand the result to the
//! repository which writes it in a single transaction.
//!
//! Items are matched strictly by product code, never by item id.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::{
    AmountOverflowError, Customer, CustomerDetails, CustomerId, Order, OrderItem, OrderItemDraft,
    Product,
};

/// Customer fields embedded in an order submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerReference {
    /// Explicit directory id; the phone is used for lookup when absent.
    pub id: Option<CustomerId>,
    pub details: CustomerDetails,
}

/// Order payload submitted for creation or reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub customer: Option<CustomerReference>,
    pub delivery_at: Option<NaiveDateTime>,
    pub delivery_fee: Option<Decimal>,
    pub items: Vec<OrderItemDraft>,
}

/// How the order's customer must be written alongside the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerAssignment {
    /// Known customer whose name and address were refreshed.
    Existing(Customer),
    /// Customer to insert before the order.
    New(CustomerDetails),
    /// Leave the order's current customer untouched.
    Retain,
}

impl CustomerAssignment {
    /// Resolve the customer for an order from a directory lookup result.
    ///
    /// A found customer keeps its phone and takes the submitted name and
    /// address; otherwise a new customer is created from the submission.
    pub fn resolve(found: Option<Customer>, details: &CustomerDetails) -> Self {
        match found {
            Some(mut customer) => {
                customer.refresh_contact(details);
                Self::Existing(customer)
            }
            None => Self::New(details.clone()),
        }
    }
}

/// Raised when a submission lists the same product more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("product {product} appears more than once in the submitted items")]
pub struct DuplicateProductError {
    pub product: Product,
}

/// Reject submissions that would break the one-item-per-product invariant.
///
/// # Errors
/// Returns the first product code that repeats.
pub fn ensure_distinct_products(items: &[OrderItemDraft]) -> Result<(), DuplicateProductError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.product) {
            return Err(DuplicateProductError {
                product: item.product,
            });
        }
    }
    Ok(())
}

/// Diff the submitted items into `order.items` by product code.
///
/// 1. Existing items whose product is absent from the submission are removed.
/// 2. Matching items take the submitted quantity and unit price; unmatched
///    submissions are appended as new items.
/// 3. Items whose quantity is now zero are dropped.
///
/// # Errors
/// [`AmountOverflowError`] when a merged subtotal is not storable.
pub fn merge_items(
    order: &mut Order,
    submitted: &[OrderItemDraft],
) -> Result<(), AmountOverflowError> {
    order
        .items
        .retain(|item| submitted.iter().any(|draft| draft.product == item.product));

    for draft in submitted {
        match order
            .items
            .iter_mut()
            .find(|item| item.product == draft.product)
        {
            Some(existing) => {
                existing.quantity = draft.quantity;
                existing.unit_price = draft.resolved_unit_price();
                existing.recompute_subtotal()?;
            }
            None => order.items.push(OrderItem::from_draft(draft)?),
        }
    }

    order.items.retain(OrderItem::is_present);
    Ok(())
}

/// Apply a submission to a persisted order: overwrite delivery data
/// unconditionally, merge items, then recompute the total.
///
/// Customer resolution needs the directory and happens in the service; the
/// resolved customer is attached by the caller.
///
/// # Errors
/// [`AmountOverflowError`] when a subtotal or the new total is not storable.
/// The order is then half-merged and must be discarded.
pub fn reconcile(
    order: &mut Order,
    submission: &OrderSubmission,
) -> Result<(), AmountOverflowError> {
    order.delivery_at = submission.delivery_at;
    order.delivery_fee = submission.delivery_fee;
    merge_items(order, &submission.items)?;
    order.recompute_total()?;
    Ok(())
}
