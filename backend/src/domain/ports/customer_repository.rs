//! Port for customer persistence.
//!
//! The [`CustomerRepository`] trait is the driven side of the customer
//! directory. Adapters enforce phone uniqueness at write time and report a
//! violation as [`CustomerRepositoryError::DuplicatePhone`].

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Customer, CustomerDetails, CustomerId, PhoneNumber};

use super::define_port_error;

define_port_error! {
    /// Errors raised by customer repository adapters.
    pub enum CustomerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "customer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "customer repository query failed: {message}",
        /// Another customer already holds the phone number.
        DuplicatePhone { phone: String } =>
            "phone {phone} is already registered",
    }
}

/// Port for customer storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Every customer ordered by id.
    async fn list(&self) -> Result<Vec<Customer>, CustomerRepositoryError>;

    /// Fetch a customer by id.
    async fn find_by_id(&self, id: CustomerId)
    -> Result<Option<Customer>, CustomerRepositoryError>;

    /// Fetch the customer holding `phone`.
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<Customer>, CustomerRepositoryError>;

    /// Insert a new customer and return it with its assigned id.
    ///
    /// # Errors
    /// [`CustomerRepositoryError::DuplicatePhone`] when the phone is taken.
    async fn create(&self, details: &CustomerDetails) -> Result<Customer, CustomerRepositoryError>;

    /// Overwrite name, phone and address of an existing customer.
    ///
    /// Returns `false` when no customer has the given id.
    async fn update(&self, customer: &Customer) -> Result<bool, CustomerRepositoryError>;

    /// Delete a customer. Orders referencing it keep existing without a
    /// customer.
    ///
    /// Returns `false` when no customer has the given id.
    async fn delete(&self, id: CustomerId) -> Result<bool, CustomerRepositoryError>;
}

/// Fixture implementation for tests that do not exercise storage.
///
/// Lookups return nothing; writes succeed without persisting anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCustomerRepository;

#[async_trait]
impl CustomerRepository for FixtureCustomerRepository {
    async fn list(&self) -> Result<Vec<Customer>, CustomerRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(None)
    }

    async fn find_by_phone(
        &self,
        _phone: &PhoneNumber,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(None)
    }

    async fn create(&self, details: &CustomerDetails) -> Result<Customer, CustomerRepositoryError> {
        let CustomerDetails {
            name,
            phone,
            address,
        } = details.clone();
        Ok(Customer {
            id: CustomerId::new(1),
            name,
            phone,
            address,
            created_at: Utc::now(),
        })
    }

    async fn update(&self, _customer: &Customer) -> Result<bool, CustomerRepositoryError> {
        Ok(true)
    }

    async fn delete(&self, _id: CustomerId) -> Result<bool, CustomerRepositoryError> {
        Ok(false)
    }
}
