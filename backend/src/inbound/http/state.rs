//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CustomerDirectory, CustomerRepository, FixtureCustomerDirectory, FixtureLoginService,
    FixtureOrderCommand, FixtureOrderItemCommand, FixtureOrderQuery, LoginService, OrderCommand,
    OrderItemCommand, OrderQuery, OrderRepository, UserAccountRepository,
};
use crate::domain::{AccountLoginService, CustomerService, OrderService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub order_items: Arc<dyn OrderItemCommand>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            customers: Arc::new(FixtureCustomerDirectory),
            orders: Arc::new(FixtureOrderCommand),
            orders_query: Arc::new(FixtureOrderQuery),
            order_items: Arc::new(FixtureOrderItemCommand),
        }
    }
}

impl HttpStatePorts {
    /// Wire the domain services over one set of repositories.
    ///
    /// The order service receives the same customer repository as the
    /// customer directory so both see the same rows.
    pub fn from_repositories<C, O, A>(customers: Arc<C>, orders: Arc<O>, accounts: Arc<A>) -> Self
    where
        C: CustomerRepository + 'static,
        O: OrderRepository + 'static,
        A: UserAccountRepository + 'static,
    {
        let order_service = Arc::new(OrderService::new(orders, Arc::clone(&customers)));
        Self {
            login: Arc::new(AccountLoginService::new(accounts)),
            customers: Arc::new(CustomerService::new(customers)),
            orders: order_service.clone(),
            orders_query: order_service.clone(),
            order_items: order_service,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub customers: Arc<dyn CustomerDirectory>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub order_items: Arc<dyn OrderItemCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use orders_backend::domain::ports::FixtureOrderQuery;
    /// use orders_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let ports = HttpStatePorts {
    ///     orders_query: Arc::new(FixtureOrderQuery),
    ///     ..HttpStatePorts::default()
    /// };
    /// let state = HttpState::new(ports);
    /// let _orders = state.orders_query.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            customers,
            orders,
            orders_query,
            order_items,
        } = ports;
        Self {
            login,
            customers,
            orders,
            orders_query,
            order_items,
        }
    }
}
