//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Reconciliation and totals are computed in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Aggregate transactions**: order writes cover the customer row, the
//!   order row and its items in one transaction.
//! - **Strongly typed errors**: database failures map onto the port error
//!   enums; a phone uniqueness violation becomes `DuplicatePhone`.
//!
//! # Example
//!
//! ```no_run
//! use orders_backend::outbound::persistence::{DbPool, DieselOrderRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), orders_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/orders")).await?;
//! let orders = DieselOrderRepository::new(pool);
//! # let _ = orders;
//! # Ok(())
//! # }
//! ```

pub(crate) mod diesel_helpers;
mod diesel_customer_repository;
mod diesel_order_repository;
mod diesel_user_account_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_user_account_repository::DieselUserAccountRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
