//! Login service backed by the user account repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{LoginService, UserAccountRepository, UserAccountRepositoryError};
use crate::domain::{AccountSummary, Error, LoginCredentials, UserAccountId};

const INVALID_CREDENTIALS: &str = "E-mail ou senha inválidos!";

/// [`LoginService`] that checks credentials against stored password digests.
#[derive(Clone)]
pub struct AccountLoginService<R> {
    accounts: Arc<R>,
}

impl<R> AccountLoginService<R> {
    /// Create a new service with the given account repository.
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }
}

fn map_account_error(error: UserAccountRepositoryError) -> Error {
    match error {
        UserAccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        UserAccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> LoginService for AccountLoginService<R>
where
    R: UserAccountRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccountSummary, Error> {
        let account = self
            .accounts
            .find_by_email(credentials.email())
            .await
            .map_err(map_account_error)?
            .filter(|account| account.password_hash.verify(credentials.password()))
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;
        info!(account_id = %account.id, "login succeeded");
        Ok(AccountSummary::from(&account))
    }

    async fn account(&self, id: UserAccountId) -> Result<Option<AccountSummary>, Error> {
        let account = self
            .accounts
            .find_by_id(id)
            .await
            .map_err(map_account_error)?;
        Ok(account.as_ref().map(AccountSummary::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserAccountRepository;
    use crate::domain::{ErrorCode, PasswordHash, UserAccount};
    use rstest::rstest;

    fn account() -> UserAccount {
        UserAccount {
            id: UserAccountId::new(4),
            name: "Caixa".to_owned(),
            email: "caixa@example.com".to_owned(),
            password_hash: PasswordHash::generate("segredo"),
        }
    }

    #[rstest]
    #[case("segredo", true)]
    #[case("Segredo", false)]
    #[tokio::test]
    async fn authenticate_verifies_password(#[case] password: &str, #[case] accepted: bool) {
        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "caixa@example.com")
            .return_once(|_| Ok(Some(account())));
        let service = AccountLoginService::new(Arc::new(repo));

        let creds =
            LoginCredentials::try_from_parts("Caixa@Example.com", password).expect("credentials");
        let result = service.authenticate(&creds).await;
        match result {
            Ok(summary) => {
                assert!(accepted, "wrong password was accepted");
                assert_eq!(summary.id, UserAccountId::new(4));
            }
            Err(err) => {
                assert!(!accepted, "valid password was rejected");
                assert_eq!(err.code(), ErrorCode::Unauthorized);
            }
        }
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_email().return_once(|_| Ok(None));
        let service = AccountLoginService::new(Arc::new(repo));

        let creds = LoginCredentials::try_from_parts("x@example.com", "pw").expect("credentials");
        let err = service.authenticate(&creds).await.expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn repository_outage_is_service_unavailable() {
        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Err(UserAccountRepositoryError::connection("refused")));
        let service = AccountLoginService::new(Arc::new(repo));

        let err = service
            .account(UserAccountId::new(1))
            .await
            .expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
