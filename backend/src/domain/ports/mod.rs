//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage.
//! Driving ports (`*Directory`, `*Command`, `*Query`, [`LoginService`]) are
//! what the HTTP adapter calls into. Each trait ships a `Fixture*`
//! implementation used when no database is configured.

mod macros;
pub(crate) use macros::define_port_error;

mod customer_directory;
mod customer_repository;
mod login_service;
mod order_command;
mod order_item_command;
mod order_query;
mod order_repository;
mod user_account_repository;

#[cfg(test)]
pub use customer_directory::MockCustomerDirectory;
pub use customer_directory::{CustomerDirectory, FixtureCustomerDirectory};
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{
    CustomerRepository, CustomerRepositoryError, FixtureCustomerRepository,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use order_command::MockOrderCommand;
pub use order_command::{FixtureOrderCommand, OrderCommand};
#[cfg(test)]
pub use order_item_command::MockOrderItemCommand;
pub use order_item_command::{FixtureOrderItemCommand, OrderItemCommand, OrderItemRecord};
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::{FixtureOrderQuery, OrderQuery};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{FixtureOrderRepository, OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use user_account_repository::MockUserAccountRepository;
pub use user_account_repository::{UserAccountRepository, UserAccountRepositoryError};
