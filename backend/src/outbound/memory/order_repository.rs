//! In-memory `OrderRepository`.

use std::cmp::Ordering;
use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{CustomerAssignment, Order, OrderId, OrderItem, OrderItemId};

use super::MemoryStore;
use super::store::{MemoryState, StoredOrder};

/// Order aggregates held in a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryOrderRepository {
    store: MemoryStore,
}

impl MemoryOrderRepository {
    /// Create a repository over the shared store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

/// Newest delivery first, undated orders last, then ascending id.
fn listing_order(left: &Order, right: &Order) -> Ordering {
    match (left.delivery_at, right.delivery_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| left.id.cmp(&right.id))
}

fn ensure_storable(items: &[OrderItem]) -> Result<(), OrderRepositoryError> {
    let mut seen = HashSet::with_capacity(items.len());
    if items.iter().all(|item| seen.insert(item.product)) {
        Ok(())
    } else {
        Err(OrderRepositoryError::query(
            "order lists the same product twice",
        ))
    }
}

/// Check the customer write can succeed before anything is mutated.
fn check_assignment(
    state: &MemoryState,
    assignment: &CustomerAssignment,
) -> Result<(), OrderRepositoryError> {
    match assignment {
        CustomerAssignment::New(details) if state.phone_taken(details.phone.as_ref(), None) => {
            Err(OrderRepositoryError::duplicate_phone(details.phone.as_ref()))
        }
        CustomerAssignment::Existing(customer)
            if !state.customers.contains_key(&customer.id.get()) =>
        {
            Err(OrderRepositoryError::query(format!(
                "customer {} does not exist",
                customer.id
            )))
        }
        _ => Ok(()),
    }
}

/// Apply the customer write; `None` keeps the current reference.
fn write_customer(state: &mut MemoryState, assignment: &CustomerAssignment) -> Option<i64> {
    match assignment {
        CustomerAssignment::Retain => None,
        CustomerAssignment::Existing(customer) => {
            if let Some(stored) = state.customers.get_mut(&customer.id.get()) {
                stored.name = customer.name.clone();
                stored.address = customer.address.clone();
            }
            Some(customer.id.get())
        }
        CustomerAssignment::New(details) => Some(state.insert_customer(details).id.get()),
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let state = self.store.lock().await;
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .map(|(id, stored)| state.hydrate(*id, stored))
            .collect();
        orders.sort_by(listing_order);
        Ok(orders)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let state = self.store.lock().await;
        Ok(state
            .orders
            .get(&id.get())
            .map(|stored| state.hydrate(id.get(), stored)))
    }

    async fn find_by_item_id(
        &self,
        id: OrderItemId,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let state = self.store.lock().await;
        Ok(state
            .orders
            .iter()
            .find(|(_, stored)| stored.items.iter().any(|item| item.id == Some(id)))
            .map(|(order_id, stored)| state.hydrate(*order_id, stored)))
    }

    async fn create(
        &self,
        customer: &CustomerAssignment,
        order: &Order,
    ) -> Result<Order, OrderRepositoryError> {
        ensure_storable(&order.items)?;
        let mut state = self.store.lock().await;
        check_assignment(&state, customer)?;

        let customer_id = write_customer(&mut state, customer);
        let id = state.next_order_id();
        let items = state.assign_item_ids(&order.items);
        let stored = StoredOrder {
            customer_id,
            items,
            delivery_at: order.delivery_at,
            delivery_fee: order.delivery_fee,
            total: order.total,
        };
        let saved = state.hydrate(id, &stored);
        state.orders.insert(id, stored);
        Ok(saved)
    }

    async fn save(
        &self,
        customer: &CustomerAssignment,
        order: &Order,
    ) -> Result<Order, OrderRepositoryError> {
        let Some(id) = order.id.map(OrderId::get) else {
            return Err(OrderRepositoryError::query("cannot save an order without id"));
        };
        ensure_storable(&order.items)?;
        let mut state = self.store.lock().await;
        let Some(current_customer) = state.orders.get(&id).map(|stored| stored.customer_id) else {
            return Err(OrderRepositoryError::not_found(id));
        };
        check_assignment(&state, customer)?;

        let customer_id = write_customer(&mut state, customer).or(current_customer);
        let items = state.assign_item_ids(&order.items);
        let stored = StoredOrder {
            customer_id,
            items,
            delivery_at: order.delivery_at,
            delivery_fee: order.delivery_fee,
            total: order.total,
        };
        let saved = state.hydrate(id, &stored);
        state.orders.insert(id, stored);
        Ok(saved)
    }

    async fn delete(&self, id: OrderId) -> Result<bool, OrderRepositoryError> {
        Ok(self.store.lock().await.orders.remove(&id.get()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerDetails, OrderItemDraft, Product};
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn repo() -> MemoryOrderRepository {
        MemoryOrderRepository::new(MemoryStore::new())
    }

    fn new_customer(phone: &str) -> CustomerAssignment {
        CustomerAssignment::New(
            CustomerDetails::try_from_parts("Ana", phone, "Rua A").expect("details"),
        )
    }

    fn order_on(day: Option<u32>) -> Order {
        Order::from_drafts(
            &[OrderItemDraft::new(Product::File, 1)],
            day.and_then(|d| NaiveDate::from_ymd_opt(2024, 1, d))
                .and_then(|d| d.and_hms_opt(12, 0, 0)),
            None,
        )
        .expect("order")
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_order_and_item_ids(repo: MemoryOrderRepository) {
        let saved = repo
            .create(&new_customer("111"), &order_on(Some(1)))
            .await
            .expect("create");
        assert_eq!(saved.id, Some(OrderId::new(1)));
        assert!(saved.items.iter().all(|item| item.id.is_some()));
        assert_eq!(
            saved.customer.map(|customer| customer.phone.to_string()),
            Some("111".to_owned())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn new_customer_with_taken_phone_writes_nothing(repo: MemoryOrderRepository) {
        repo.create(&new_customer("111"), &order_on(None))
            .await
            .expect("first");
        let err = repo
            .create(&new_customer("111"), &order_on(None))
            .await
            .expect_err("duplicate phone");
        assert_eq!(err, OrderRepositoryError::duplicate_phone("111"));
        assert_eq!(repo.list().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn list_sorts_by_delivery_desc_with_undated_last(repo: MemoryOrderRepository) {
        for day in [Some(3), None, Some(9), Some(3)] {
            repo.create(&CustomerAssignment::Retain, &order_on(day))
                .await
                .expect("create");
        }
        let ids: Vec<i64> = repo
            .list()
            .await
            .expect("list")
            .into_iter()
            .filter_map(|order| order.id.map(OrderId::get))
            .collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
    }

    #[rstest]
    #[tokio::test]
    async fn save_keeps_customer_when_retained(repo: MemoryOrderRepository) {
        let mut saved = repo
            .create(&new_customer("111"), &order_on(Some(1)))
            .await
            .expect("create");
        saved.delivery_fee = Some(dec!(4));
        let updated = repo
            .save(&CustomerAssignment::Retain, &saved)
            .await
            .expect("save");
        assert_eq!(updated.delivery_fee, Some(dec!(4)));
        assert!(updated.customer.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn save_of_missing_order_is_not_found(repo: MemoryOrderRepository) {
        let mut order = order_on(None);
        order.id = Some(OrderId::new(42));
        let err = repo
            .save(&CustomerAssignment::Retain, &order)
            .await
            .expect_err("missing");
        assert_eq!(err, OrderRepositoryError::not_found(42_i64));
    }

    #[rstest]
    #[tokio::test]
    async fn find_by_item_id_returns_owner(repo: MemoryOrderRepository) {
        let saved = repo
            .create(&CustomerAssignment::Retain, &order_on(None))
            .await
            .expect("create");
        let item_id = saved.items.first().and_then(|item| item.id).expect("item id");
        let owner = repo
            .find_by_item_id(item_id)
            .await
            .expect("lookup")
            .expect("owner");
        assert_eq!(owner.id, saved.id);
    }
}
