//! In-process repository adapters.
//!
//! Used when no database URL is configured and by the HTTP integration tests.
//! All three repositories share one [`MemoryStore`], so an order write sees
//! the customers written through the customer repository.

mod customer_repository;
mod order_repository;
mod store;
mod user_account_repository;

pub use customer_repository::MemoryCustomerRepository;
pub use order_repository::MemoryOrderRepository;
pub use store::{DEVELOPMENT_ACCOUNT_EMAIL, DEVELOPMENT_ACCOUNT_PASSWORD, MemoryStore};
pub use user_account_repository::MemoryUserAccountRepository;
