//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers, the pure order algorithms (total calculation,
//! reconciliation, filtering) and the services implementing the driving
//! ports. Nothing in here depends on actix or diesel.
//!
//! Public surface:
//! - [`Product`]: the fixed catalog.
//! - [`Customer`] and its validated value types.
//! - [`Order`], [`OrderItem`]: the order aggregate.
//! - [`reconcile`], [`OrderFilter`]: merge and search algorithms.
//! - [`Error`], [`ErrorCode`]: the error payload crossing driving ports.
//! - [`CustomerService`], [`OrderService`], [`AccountLoginService`].

pub mod account_login_service;
pub mod auth;
pub mod customer;
pub mod customer_service;
pub mod error;
pub mod order;
pub mod order_filter;
pub mod order_reconciliation;
pub mod order_service;
pub mod ports;
pub mod product;
pub mod trace_id;

pub use self::account_login_service::AccountLoginService;
pub use self::auth::{
    AccountSummary, LoginCredentials, LoginValidationError, PasswordHash,
    PasswordHashFormatError, UserAccount, UserAccountId,
};
pub use self::customer::{
    ADDRESS_MAX, Address, CUSTOMER_NAME_MAX, Customer, CustomerDetails, CustomerId, CustomerName,
    CustomerValidationError, PHONE_MAX, PhoneNumber,
};
pub use self::customer_service::CustomerService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::order::{
    AMOUNT_SCALE, AmountOverflowError, MAX_AMOUNT, MAX_QUANTITY, Order, OrderId, OrderItem,
    OrderItemDraft, OrderItemId,
};
pub use self::order_filter::{
    OrderFilter, OrderItemLine, OrderSearchResult, OrderSummary, OrderWithQuantities,
    ProductQuantity,
};
pub use self::order_reconciliation::{
    CustomerAssignment, CustomerReference, DuplicateProductError, OrderSubmission,
    ensure_distinct_products, merge_items, reconcile,
};
pub use self::order_service::OrderService;
pub use self::product::{Product, UnknownProductError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use orders_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
