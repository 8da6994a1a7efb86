//! Driving port for the order item sub-resource.
//!
//! Items are only ever written through their parent order so the order total
//! stays consistent; every mutation recomputes and stores the total.

use async_trait::async_trait;

use crate::domain::{Error, OrderId, OrderItem, OrderItemDraft, OrderItemId};

/// A stored item together with the order that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub order_id: OrderId,
    pub item: OrderItem,
}

/// Item mutations routed through the order aggregate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderItemCommand: Send + Sync {
    /// Attach a new item to `order_id`.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the order is unknown and
    /// [`crate::domain::ErrorCode::InvalidRequest`] when the order already
    /// holds the product.
    async fn add_item(
        &self,
        order_id: OrderId,
        draft: OrderItemDraft,
    ) -> Result<OrderItemRecord, Error>;

    /// Change product, quantity or unit price of an item.
    async fn update_item(
        &self,
        id: OrderItemId,
        draft: OrderItemDraft,
    ) -> Result<OrderItemRecord, Error>;

    /// Remove an item from its order.
    async fn remove_item(&self, id: OrderItemId) -> Result<(), Error>;
}

/// Fixture item port with no storage behind it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderItemCommand;

#[async_trait]
impl OrderItemCommand for FixtureOrderItemCommand {
    async fn add_item(
        &self,
        order_id: OrderId,
        _draft: OrderItemDraft,
    ) -> Result<OrderItemRecord, Error> {
        Err(Error::not_found(format!("order {order_id} not found")))
    }

    async fn update_item(
        &self,
        id: OrderItemId,
        _draft: OrderItemDraft,
    ) -> Result<OrderItemRecord, Error> {
        Err(Error::not_found(format!("item {id} not found")))
    }

    async fn remove_item(&self, id: OrderItemId) -> Result<(), Error> {
        Err(Error::not_found(format!("item {id} not found")))
    }
}
