//! PostgreSQL-backed `CustomerRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{Customer, CustomerDetails, CustomerId, PhoneNumber};

use super::diesel_helpers::{
    collect_rows, is_phone_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CustomerRow, CustomerUpdate, NewCustomerRow};
use super::pool::{DbPool, PoolError};
use super::schema::customers;

/// Diesel-backed implementation of the customer repository port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CustomerRepositoryError {
    map_basic_pool_error(error, CustomerRepositoryError::connection)
}

/// Map a Diesel error, translating the phone constraint into a domain error.
fn map_diesel_error(error: diesel::result::Error, phone: &PhoneNumber) -> CustomerRepositoryError {
    if is_phone_violation(&error) {
        return CustomerRepositoryError::duplicate_phone(phone.as_ref());
    }
    map_basic_diesel_error(
        error,
        CustomerRepositoryError::query,
        CustomerRepositoryError::connection,
    )
}

fn map_read_error(error: diesel::result::Error) -> CustomerRepositoryError {
    map_basic_diesel_error(
        error,
        CustomerRepositoryError::query,
        CustomerRepositoryError::connection,
    )
}

fn row_to_customer(row: CustomerRow) -> Result<Customer, CustomerRepositoryError> {
    Customer::try_from(row).map_err(CustomerRepositoryError::query)
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn list(&self) -> Result<Vec<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CustomerRow> = customers::table
            .select(CustomerRow::as_select())
            .order_by(customers::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        collect_rows(
            rows.into_iter().map(Customer::try_from),
            CustomerRepositoryError::query,
        )
    }

    async fn find_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        customers::table
            .find(id.get())
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?
            .map(row_to_customer)
            .transpose()
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        customers::table
            .filter(customers::phone.eq(phone.as_ref()))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?
            .map(row_to_customer)
            .transpose()
    }

    async fn create(&self, details: &CustomerDetails) -> Result<Customer, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(customers::table)
            .values(NewCustomerRow {
                name: details.name.as_ref(),
                phone: details.phone.as_ref(),
                address: details.address.as_ref(),
            })
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &details.phone))?;
        row_to_customer(row)
    }

    async fn update(&self, customer: &Customer) -> Result<bool, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(customers::table.find(customer.id.get()))
            .set(CustomerUpdate {
                name: customer.name.as_ref(),
                phone: customer.phone.as_ref(),
                address: customer.address.as_ref(),
            })
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &customer.phone))?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(customers::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(deleted > 0)
    }
}
