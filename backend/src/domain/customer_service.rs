//! Customer directory service.
//!
//! Implements [`CustomerDirectory`] over a [`CustomerRepository`]. Phone
//! uniqueness is checked before any write so a conflict surfaces as a client
//! error; the storage constraint still backs it up under concurrent writes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{CustomerDirectory, CustomerRepository, CustomerRepositoryError};
use crate::domain::{Customer, CustomerDetails, CustomerId, Error, PhoneNumber};

/// Customer directory backed by a repository.
#[derive(Clone)]
pub struct CustomerService<R> {
    repo: Arc<R>,
}

impl<R> CustomerService<R> {
    /// Create a new service with the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

/// Domain error for a phone already held by another customer.
pub(crate) fn duplicate_phone_error(phone: &str) -> Error {
    Error::duplicate_phone("Já existe um cliente com esse telefone.").with_details(json!({
        "field": "phone",
        "code": "duplicate",
        "value": phone,
    }))
}

pub(crate) fn map_customer_repository_error(error: CustomerRepositoryError) -> Error {
    match error {
        CustomerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("customer repository unavailable: {message}"))
        }
        CustomerRepositoryError::Query { message } => {
            Error::internal(format!("customer repository error: {message}"))
        }
        CustomerRepositoryError::DuplicatePhone { phone } => duplicate_phone_error(&phone),
    }
}

pub(crate) fn customer_not_found(id: CustomerId) -> Error {
    Error::not_found(format!("Cliente não encontrado com id: {id}"))
}

#[async_trait]
impl<R> CustomerDirectory for CustomerService<R>
where
    R: CustomerRepository,
{
    async fn list(&self) -> Result<Vec<Customer>, Error> {
        self.repo.list().await.map_err(map_customer_repository_error)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_customer_repository_error)
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Customer>, Error> {
        self.repo
            .find_by_phone(phone)
            .await
            .map_err(map_customer_repository_error)
    }

    async fn create(&self, details: CustomerDetails) -> Result<Customer, Error> {
        if self.find_by_phone(&details.phone).await?.is_some() {
            return Err(duplicate_phone_error(details.phone.as_ref()));
        }
        let customer = self
            .repo
            .create(&details)
            .await
            .map_err(map_customer_repository_error)?;
        info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    async fn update(&self, id: CustomerId, details: CustomerDetails) -> Result<Customer, Error> {
        let mut customer = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| customer_not_found(id))?;

        let holder = self.find_by_phone(&details.phone).await?;
        if holder.is_some_and(|other| other.id != id) {
            return Err(duplicate_phone_error(details.phone.as_ref()));
        }

        customer.apply(details);
        let updated = self
            .repo
            .update(&customer)
            .await
            .map_err(map_customer_repository_error)?;
        if !updated {
            return Err(customer_not_found(id));
        }
        info!(customer_id = %id, "customer updated");
        Ok(customer)
    }

    async fn delete(&self, id: CustomerId) -> Result<(), Error> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(map_customer_repository_error)?;
        if !deleted {
            return Err(customer_not_found(id));
        }
        info!(customer_id = %id, "customer deleted");
        Ok(())
    }
}
