//! PostgreSQL-backed `UserAccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserAccountRepository, UserAccountRepositoryError};
use crate::domain::{UserAccount, UserAccountId};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::UserAccountRow;
use super::pool::{DbPool, PoolError};
use super::schema::user_accounts;

/// Diesel-backed implementation of the user account repository port.
#[derive(Clone)]
pub struct DieselUserAccountRepository {
    pool: DbPool,
}

impl DieselUserAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserAccountRepositoryError {
    map_basic_pool_error(error, UserAccountRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserAccountRepositoryError {
    map_basic_diesel_error(
        error,
        UserAccountRepositoryError::query,
        UserAccountRepositoryError::connection,
    )
}

fn row_to_account(row: UserAccountRow) -> Result<UserAccount, UserAccountRepositoryError> {
    UserAccount::try_from(row).map_err(UserAccountRepositoryError::query)
}

#[async_trait]
impl UserAccountRepository for DieselUserAccountRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        user_accounts::table
            .filter(user_accounts::email.eq(email))
            .select(UserAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_account)
            .transpose()
    }

    async fn find_by_id(
        &self,
        id: UserAccountId,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        user_accounts::table
            .find(id.get())
            .select(UserAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_account)
            .transpose()
    }
}
