//! Shared in-process state behind the memory repositories.
//!
//! A single [`MemoryStore`] holds customers, orders and accounts under one
//! async mutex. Each repository method takes the lock once, validates, then
//! mutates, so a failed write leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{
    Customer, CustomerDetails, CustomerId, Order, OrderId, OrderItem, OrderItemId, PasswordHash,
    UserAccount, UserAccountId,
};

/// Email of the account seeded by [`MemoryStore::with_development_account`].
pub const DEVELOPMENT_ACCOUNT_EMAIL: &str = "admin@example.com";
/// Password of the account seeded by [`MemoryStore::with_development_account`].
pub const DEVELOPMENT_ACCOUNT_PASSWORD: &str = "password";

/// Order header and items as stored; the customer is held by reference.
#[derive(Debug, Clone)]
pub(super) struct StoredOrder {
    pub customer_id: Option<i64>,
    pub items: Vec<OrderItem>,
    pub delivery_at: Option<NaiveDateTime>,
    pub delivery_fee: Option<Decimal>,
    pub total: Decimal,
}

#[derive(Debug, Default)]
pub(super) struct MemoryState {
    pub customers: BTreeMap<i64, Customer>,
    pub orders: BTreeMap<i64, StoredOrder>,
    pub accounts: Vec<UserAccount>,
    next_customer_id: i64,
    next_order_id: i64,
    next_item_id: i64,
}

impl MemoryState {
    pub fn phone_taken(&self, phone: &str, except: Option<i64>) -> bool {
        self.customers
            .values()
            .any(|customer| customer.phone.as_ref() == phone && Some(customer.id.get()) != except)
    }

    pub fn insert_customer(&mut self, details: &CustomerDetails) -> Customer {
        self.next_customer_id += 1;
        let CustomerDetails {
            name,
            phone,
            address,
        } = details.clone();
        let customer = Customer {
            id: CustomerId::new(self.next_customer_id),
            name,
            phone,
            address,
            created_at: Utc::now(),
        };
        self.customers.insert(customer.id.get(), customer.clone());
        customer
    }

    pub fn next_order_id(&mut self) -> i64 {
        self.next_order_id += 1;
        self.next_order_id
    }

    /// Give every unsaved item an id.
    pub fn assign_item_ids(&mut self, items: &[OrderItem]) -> Vec<OrderItem> {
        items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.id.is_none() {
                    self.next_item_id += 1;
                    item.id = Some(OrderItemId::new(self.next_item_id));
                }
                item
            })
            .collect()
    }

    /// Rebuild the aggregate with the customer's current row.
    pub fn hydrate(&self, id: i64, stored: &StoredOrder) -> Order {
        Order {
            id: Some(OrderId::new(id)),
            customer: stored
                .customer_id
                .and_then(|customer_id| self.customers.get(&customer_id).cloned()),
            items: stored.items.clone(),
            delivery_at: stored.delivery_at,
            delivery_fee: stored.delivery_fee,
            total: stored.total,
        }
    }
}

/// Cloneable handle to the shared in-memory state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one account for local development.
    pub fn with_development_account() -> Self {
        let account = UserAccount {
            id: UserAccountId::new(1),
            name: "Administrador".to_owned(),
            email: DEVELOPMENT_ACCOUNT_EMAIL.to_owned(),
            password_hash: PasswordHash::generate(DEVELOPMENT_ACCOUNT_PASSWORD),
        };
        let state = MemoryState {
            accounts: vec![account],
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub(super) async fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().await
    }
}
