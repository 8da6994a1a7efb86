//! Driving port for order reads.

use async_trait::async_trait;

use crate::domain::{Error, Order, OrderFilter, OrderId, OrderItemId, OrderSearchResult};

use super::OrderItemRecord;

/// Read-side order use-cases.
///
/// Returned orders hide items whose quantity is zero, except for
/// [`OrderQuery::detail_grid`] which pads the full catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Every order, newest delivery first.
    async fn list(&self) -> Result<Vec<Order>, Error>;

    /// One order by id.
    async fn find(&self, id: OrderId) -> Result<Option<Order>, Error>;

    /// One order with a zero-quantity row for every catalog product it lacks.
    async fn detail_grid(&self, id: OrderId) -> Result<Option<Order>, Error>;

    /// Apply search filters over every order.
    async fn search(&self, filter: OrderFilter) -> Result<OrderSearchResult, Error>;

    /// Every stored item across all orders.
    async fn list_items(&self) -> Result<Vec<OrderItemRecord>, Error>;

    /// One stored item by id.
    async fn find_item(&self, id: OrderItemId) -> Result<Option<OrderItemRecord>, Error>;
}

/// Fixture query port with no orders.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderQuery;

#[async_trait]
impl OrderQuery for FixtureOrderQuery {
    async fn list(&self) -> Result<Vec<Order>, Error> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: OrderId) -> Result<Option<Order>, Error> {
        Ok(None)
    }

    async fn detail_grid(&self, _id: OrderId) -> Result<Option<Order>, Error> {
        Ok(None)
    }

    async fn search(&self, filter: OrderFilter) -> Result<OrderSearchResult, Error> {
        Ok(filter.apply(&[]))
    }

    async fn list_items(&self) -> Result<Vec<OrderItemRecord>, Error> {
        Ok(Vec::new())
    }

    async fn find_item(&self, _id: OrderItemId) -> Result<Option<OrderItemRecord>, Error> {
        Ok(None)
    }
}
