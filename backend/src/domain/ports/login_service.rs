//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call it to check credentials without knowing the backing
//! storage, so handler tests can substitute a double instead of wiring a
//! database.

use async_trait::async_trait;

use crate::domain::{AccountSummary, Error, LoginCredentials, UserAccountId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::Unauthorized`] on any mismatch, without
    /// revealing whether the email exists.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccountSummary, Error>;

    /// Account behind a session, if it still exists.
    async fn account(&self, id: UserAccountId) -> Result<Option<AccountSummary>, Error>;
}

const FIXTURE_EMAIL: &str = "admin@example.com";
const FIXTURE_PASSWORD: &str = "password";
const FIXTURE_NAME: &str = "Administrador";

/// In-memory authenticator accepting `admin@example.com` / `password`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

impl FixtureLoginService {
    fn account_summary() -> AccountSummary {
        AccountSummary {
            id: UserAccountId::new(1),
            name: FIXTURE_NAME.to_owned(),
            email: FIXTURE_EMAIL.to_owned(),
        }
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccountSummary, Error> {
        if credentials.email() == FIXTURE_EMAIL && credentials.password() == FIXTURE_PASSWORD {
            Ok(Self::account_summary())
        } else {
            Err(Error::unauthorized("E-mail ou senha inválidos!"))
        }
    }

    async fn account(&self, id: UserAccountId) -> Result<Option<AccountSummary>, Error> {
        Ok((id == UserAccountId::new(1)).then(Self::account_summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin@example.com", "password", true)]
    #[case("ADMIN@example.com", "password", true)]
    #[case("admin@example.com", "wrong", false)]
    #[case("other@example.com", "password", false)]
    #[tokio::test]
    async fn fixture_login_service_checks_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds = LoginCredentials::try_from_parts(email, password).expect("credentials shape");
        let result = FixtureLoginService.authenticate(&creds).await;
        match (should_succeed, result) {
            (true, Ok(account)) => assert_eq!(account.email, FIXTURE_EMAIL),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(account)) => panic!("expected failure, got success: {account:?}"),
        }
    }

    #[tokio::test]
    async fn fixture_account_lookup_only_knows_admin() {
        let found = FixtureLoginService
            .account(UserAccountId::new(1))
            .await
            .expect("lookup");
        assert!(found.is_some());
        let missing = FixtureLoginService
            .account(UserAccountId::new(2))
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }
}
