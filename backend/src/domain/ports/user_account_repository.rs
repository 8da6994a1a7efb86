//! Port for back-office account lookups.

use async_trait::async_trait;

use crate::domain::{UserAccount, UserAccountId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user account repository adapters.
    pub enum UserAccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user account repository connection failed: {message}",
        /// Query failed during execution or a stored row was malformed.
        Query { message: String } =>
            "user account repository query failed: {message}",
    }
}

/// Port for reading user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Fetch an account by its normalised (lower-case) email.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError>;

    /// Fetch an account by id.
    async fn find_by_id(
        &self,
        id: UserAccountId,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError>;
}
