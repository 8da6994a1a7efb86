//! Port for order aggregate persistence.
//!
//! The [`OrderRepository`] reads and writes whole [`Order`] aggregates. Every
//! write covers the customer row, the order row and its items, and must commit
//! or roll back as one unit.

use async_trait::async_trait;

use crate::domain::{CustomerAssignment, Order, OrderId, OrderItemId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "order repository query failed: {message}",
        /// The customer write hit the phone uniqueness constraint.
        DuplicatePhone { phone: String } =>
            "phone {phone} is already registered",
        /// The order to save no longer exists.
        NotFound { id: i64 } =>
            "order {id} not found",
    }
}

/// Port for order aggregate storage.
///
/// Loaded orders always carry their id, their item ids, and the customer
/// they reference (or `None` when that customer was deleted).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Every order, newest delivery date first, orders without a delivery
    /// date last, ties broken by ascending id.
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Fetch an order by id.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Fetch the order owning the given item.
    async fn find_by_item_id(&self, id: OrderItemId)
    -> Result<Option<Order>, OrderRepositoryError>;

    /// Insert a new order together with its customer write and items.
    async fn create(
        &self,
        customer: &CustomerAssignment,
        order: &Order,
    ) -> Result<Order, OrderRepositoryError>;

    /// Write an existing order: customer write, order row, then item
    /// deletes, updates and inserts so the stored items equal `order.items`.
    ///
    /// # Errors
    /// [`OrderRepositoryError::NotFound`] when the order id does not exist.
    async fn save(
        &self,
        customer: &CustomerAssignment,
        order: &Order,
    ) -> Result<Order, OrderRepositoryError>;

    /// Delete an order and its items. Returns `false` when absent.
    async fn delete(&self, id: OrderId) -> Result<bool, OrderRepositoryError>;
}

/// Fixture implementation for tests that do not exercise storage.
///
/// Lookups return nothing; writes echo the order back with id 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn find_by_item_id(
        &self,
        _id: OrderItemId,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn create(
        &self,
        _customer: &CustomerAssignment,
        order: &Order,
    ) -> Result<Order, OrderRepositoryError> {
        let mut saved = order.clone();
        saved.id = Some(OrderId::new(1));
        Ok(saved)
    }

    async fn save(
        &self,
        _customer: &CustomerAssignment,
        order: &Order,
    ) -> Result<Order, OrderRepositoryError> {
        Ok(order.clone())
    }

    async fn delete(&self, _id: OrderId) -> Result<bool, OrderRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerDetails, OrderItemDraft, Product};

    #[tokio::test]
    async fn fixture_create_assigns_an_id() {
        let order = Order::from_drafts(&[OrderItemDraft::new(Product::File, 1)], None, None)
            .expect("order");
        let details = CustomerDetails::try_from_parts("Ana", "111", "Rua A").expect("details");
        let saved = FixtureOrderRepository
            .create(&CustomerAssignment::New(details), &order)
            .await
            .expect("fixture create");
        assert_eq!(saved.id, Some(OrderId::new(1)));
        assert_eq!(saved.total, order.total);
    }

    #[test]
    fn not_found_error_formats_id() {
        assert_eq!(
            OrderRepositoryError::not_found(9_i64).to_string(),
            "order 9 not found"
        );
    }
}
