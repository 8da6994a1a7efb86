//! Driving port for order mutations.

use async_trait::async_trait;

use crate::domain::{Error, Order, OrderId, OrderSubmission};

/// Order creation, reconciliation and deletion use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Create an order, resolving its customer by phone.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::InvalidRequest`] when the submission has no
    /// customer or repeats a product.
    async fn submit_new_order(&self, submission: OrderSubmission) -> Result<Order, Error>;

    /// Merge a submission into the persisted order `id`.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the order does not exist.
    async fn reconcile(&self, id: OrderId, submission: OrderSubmission) -> Result<Order, Error>;

    /// Delete an order and its items; the customer is kept.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when the order does not exist.
    async fn delete(&self, id: OrderId) -> Result<(), Error>;
}

/// Fixture command port that has no storage behind it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderCommand;

#[async_trait]
impl OrderCommand for FixtureOrderCommand {
    async fn submit_new_order(&self, _submission: OrderSubmission) -> Result<Order, Error> {
        Err(Error::service_unavailable("order storage is not configured"))
    }

    async fn reconcile(&self, id: OrderId, _submission: OrderSubmission) -> Result<Order, Error> {
        Err(Error::not_found(format!("order {id} not found")))
    }

    async fn delete(&self, id: OrderId) -> Result<(), Error> {
        Err(Error::not_found(format!("order {id} not found")))
    }
}
