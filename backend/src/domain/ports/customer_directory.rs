//! Driving port for the customer directory.
//!
//! HTTP handlers use [`CustomerDirectory`] for customer CRUD. Implementations
//! enforce the phone uniqueness invariant and map storage failures onto the
//! domain error taxonomy.

use async_trait::async_trait;

use crate::domain::{Customer, CustomerDetails, CustomerId, Error, PhoneNumber};

/// Customer directory use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Every customer ordered by id.
    async fn list(&self) -> Result<Vec<Customer>, Error>;

    /// Fetch a customer by id.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, Error>;

    /// Fetch the customer holding `phone`.
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Customer>, Error>;

    /// Register a new customer.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::DuplicatePhone`] when the phone is taken.
    async fn create(&self, details: CustomerDetails) -> Result<Customer, Error>;

    /// Replace a customer's fields.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when `id` is unknown and
    /// [`crate::domain::ErrorCode::DuplicatePhone`] when a different customer
    /// holds the phone.
    async fn update(&self, id: CustomerId, details: CustomerDetails) -> Result<Customer, Error>;

    /// Remove a customer. Orders referencing it survive without a customer.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when `id` is unknown.
    async fn delete(&self, id: CustomerId) -> Result<(), Error>;
}

/// Fixture directory that knows no customers and refuses writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCustomerDirectory;

#[async_trait]
impl CustomerDirectory for FixtureCustomerDirectory {
    async fn list(&self) -> Result<Vec<Customer>, Error> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: CustomerId) -> Result<Option<Customer>, Error> {
        Ok(None)
    }

    async fn find_by_phone(&self, _phone: &PhoneNumber) -> Result<Option<Customer>, Error> {
        Ok(None)
    }

    async fn create(&self, _details: CustomerDetails) -> Result<Customer, Error> {
        Err(Error::service_unavailable("customer directory is not configured"))
    }

    async fn update(&self, id: CustomerId, _details: CustomerDetails) -> Result<Customer, Error> {
        Err(Error::not_found(format!("customer {id} not found")))
    }

    async fn delete(&self, id: CustomerId) -> Result<(), Error> {
        Err(Error::not_found(format!("customer {id} not found")))
    }
}
