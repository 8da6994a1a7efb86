//! In-memory `UserAccountRepository`.

use async_trait::async_trait;

use crate::domain::ports::{UserAccountRepository, UserAccountRepositoryError};
use crate::domain::{UserAccount, UserAccountId};

use super::MemoryStore;

/// Accounts held in a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryUserAccountRepository {
    store: MemoryStore,
}

impl MemoryUserAccountRepository {
    /// Create a repository over the shared store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserAccountRepository for MemoryUserAccountRepository {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        let state = self.store.lock().await;
        Ok(state
            .accounts
            .iter()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn find_by_id(
        &self,
        id: UserAccountId,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        let state = self.store.lock().await;
        Ok(state.accounts.iter().find(|account| account.id == id).cloned())
    }
}
