//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types validate the
//! stored values and report malformed rows as strings for the caller to wrap
//! in its repository error.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{
    Address, Customer, CustomerId, CustomerName, OrderItem, OrderItemId, PasswordHash,
    PhoneNumber, Product, UserAccount, UserAccountId,
};

use super::schema::{customers, order_items, orders, user_accounts};

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

/// Row struct for reading from the customers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating customers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = customers)]
pub(crate) struct NewCustomerRow<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
}

/// Changeset replacing a customer's contact fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = customers)]
pub(crate) struct CustomerUpdate<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = String;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let malformed = |err| format!("malformed customer {}: {err}", row.id);
        Ok(Self {
            id: CustomerId::new(row.id),
            name: CustomerName::new(&row.name).map_err(malformed)?,
            phone: PhoneNumber::new(&row.phone).map_err(malformed)?,
            address: Address::new(&row.address).map_err(malformed)?,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub delivery_at: Option<NaiveDateTime>,
    pub delivery_fee: Option<Decimal>,
    pub total: Decimal,
}

/// Insertable struct for creating order headers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow {
    pub customer_id: Option<i64>,
    pub delivery_at: Option<NaiveDateTime>,
    pub delivery_fee: Option<Decimal>,
    pub total: Decimal,
}

/// Changeset overwriting an order header. `None` values are written as
/// NULL rather than skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = orders, treat_none_as_null = true)]
pub(crate) struct OrderUpdate {
    pub customer_id: Option<i64>,
    pub delivery_at: Option<NaiveDateTime>,
    pub delivery_fee: Option<Decimal>,
    pub total: Decimal,
}

// ---------------------------------------------------------------------------
// Order items
// ---------------------------------------------------------------------------

/// Row struct for reading from the order_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_code: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Insertable struct for order lines.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub(crate) struct NewOrderItemRow<'a> {
    pub order_id: i64,
    pub product_code: &'a str,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Changeset for an existing order line.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = order_items)]
pub(crate) struct OrderItemUpdate<'a> {
    pub product_code: &'a str,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Convert a domain quantity into the `INTEGER` column type.
pub(crate) fn quantity_for_db(quantity: u32) -> Result<i32, String> {
    i32::try_from(quantity).map_err(|_| format!("quantity {quantity} exceeds column range"))
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = String;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let product = Product::lookup(&row.product_code)
            .map_err(|err| format!("malformed order item {}: {err}", row.id))?;
        let quantity = u32::try_from(row.quantity)
            .map_err(|_| format!("negative quantity on order item {}", row.id))?;
        Ok(Self {
            id: Some(OrderItemId::new(row.id)),
            product,
            quantity,
            unit_price: row.unit_price,
            subtotal: row.subtotal,
        })
    }
}

// ---------------------------------------------------------------------------
// User accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the user_accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAccountRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl TryFrom<UserAccountRow> for UserAccount {
    type Error = String;

    fn try_from(row: UserAccountRow) -> Result<Self, Self::Error> {
        let password_hash = PasswordHash::parse(&row.password_hash)
            .map_err(|err| format!("account {}: {err}", row.id))?;
        Ok(Self {
            id: UserAccountId::new(row.id),
            name: row.name,
            email: row.email,
            password_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn item_row(code: &str, quantity: i32) -> OrderItemRow {
        OrderItemRow {
            id: 3,
            order_id: 1,
            product_code: code.to_owned(),
            quantity,
            unit_price: dec!(3.00),
            subtotal: dec!(6.00),
        }
    }

    #[rstest]
    fn item_row_converts_to_domain() {
        let item = OrderItem::try_from(item_row("TEMPERO", 2)).expect("valid row");
        assert_eq!(item.product, Product::Tempero);
        assert_eq!(item.id, Some(OrderItemId::new(3)));
    }

    #[rstest]
    #[case(item_row("SALMAO", 1))]
    #[case(item_row("FILE", -1))]
    fn malformed_item_rows_are_rejected(#[case] row: OrderItemRow) {
        assert!(OrderItem::try_from(row).is_err());
    }

    #[rstest]
    fn blank_customer_name_is_malformed() {
        let row = CustomerRow {
            id: 9,
            name: "  ".to_owned(),
            phone: "111".to_owned(),
            address: "Rua A".to_owned(),
            created_at: Utc::now(),
        };
        let err = Customer::try_from(row).expect_err("blank name");
        assert!(err.contains("customer 9"));
    }

    #[rstest]
    fn account_row_requires_encoded_hash() {
        let row = UserAccountRow {
            id: 1,
            name: "Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password_hash: "password".to_owned(),
        };
        assert!(UserAccount::try_from(row).is_err());
    }

    #[rstest]
    fn oversized_quantity_is_rejected_for_storage() {
        assert!(quantity_for_db(u32::MAX).is_err());
        assert_eq!(quantity_for_db(4), Ok(4));
    }
}
