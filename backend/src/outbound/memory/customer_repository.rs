//! In-memory `CustomerRepository`.

use async_trait::async_trait;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{Customer, CustomerDetails, CustomerId, PhoneNumber};

use super::MemoryStore;

/// Customer directory held in a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryCustomerRepository {
    store: MemoryStore,
}

impl MemoryCustomerRepository {
    /// Create a repository over the shared store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn list(&self) -> Result<Vec<Customer>, CustomerRepositoryError> {
        Ok(self.store.lock().await.customers.values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(self.store.lock().await.customers.get(&id.get()).cloned())
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let state = self.store.lock().await;
        Ok(state
            .customers
            .values()
            .find(|customer| customer.phone == *phone)
            .cloned())
    }

    async fn create(&self, details: &CustomerDetails) -> Result<Customer, CustomerRepositoryError> {
        let mut state = self.store.lock().await;
        if state.phone_taken(details.phone.as_ref(), None) {
            return Err(CustomerRepositoryError::duplicate_phone(details.phone.as_ref()));
        }
        Ok(state.insert_customer(details))
    }

    async fn update(&self, customer: &Customer) -> Result<bool, CustomerRepositoryError> {
        let mut state = self.store.lock().await;
        if !state.customers.contains_key(&customer.id.get()) {
            return Ok(false);
        }
        if state.phone_taken(customer.phone.as_ref(), Some(customer.id.get())) {
            return Err(CustomerRepositoryError::duplicate_phone(customer.phone.as_ref()));
        }
        if let Some(stored) = state.customers.get_mut(&customer.id.get()) {
            stored.name = customer.name.clone();
            stored.phone = customer.phone.clone();
            stored.address = customer.address.clone();
        }
        Ok(true)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, CustomerRepositoryError> {
        let mut state = self.store.lock().await;
        if state.customers.remove(&id.get()).is_none() {
            return Ok(false);
        }
        for order in state.orders.values_mut() {
            if order.customer_id == Some(id.get()) {
                order.customer_id = None;
            }
        }
        Ok(true)
    }
}
