//! Authentication handlers.
//!
//! ```text
//! POST /api/auth/login {"email":"admin@example.com","senha":"password"}
//! GET /api/auth/me
//! POST /api/auth/logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{AccountSummary, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[serde(alias = "senha")]
    #[schema(example = "password")]
    pub password: String,
}

/// Authenticated account returned by login and `me`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<AccountSummary> for AccountResponse {
    fn from(value: AccountSummary) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            email: value.email,
        }
    }
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate a back-office account and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (
            status = 200,
            description = "Login success",
            body = AccountResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Account store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AccountResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let account = state.login.authenticate(&credentials).await?;
    session.persist_account(account.id)?;
    Ok(web::Json(AccountResponse::from(account)))
}

/// Account behind the current session.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Logged-in account", body = AccountResponse),
        (status = 401, description = "No active session", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountResponse>> {
    let id = session.require_account_id()?;
    let account = state.login.account(id).await?.ok_or_else(|| {
        session.clear();
        Error::unauthorized("login required")
    })?;
    Ok(web::Json(AccountResponse::from(account)))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
