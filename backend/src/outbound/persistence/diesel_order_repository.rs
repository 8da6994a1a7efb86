//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Aggregates are read with three queries (orders, their customers, their
//! items) and written inside one transaction: customer write, order row, then
//! item deletes, updates and inserts.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Customer, CustomerAssignment, Order, OrderId, OrderItem, OrderItemId};

use super::diesel_helpers::{
    collect_rows, is_phone_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    CustomerRow, NewCustomerRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderItemUpdate,
    OrderRow, OrderUpdate, quantity_for_db,
};
use super::pool::{DbPool, PoolError};
use super::schema::{customers, order_items, orders};

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside an aggregate write transaction.
#[derive(Debug)]
enum WriteError {
    Diesel(DieselError),
    Missing(i64),
    Malformed(String),
}

impl From<DieselError> for WriteError {
    fn from(value: DieselError) -> Self {
        Self::Diesel(value)
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_basic_pool_error(error, OrderRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> OrderRepositoryError {
    map_basic_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

fn assignment_phone(assignment: &CustomerAssignment) -> Option<&str> {
    match assignment {
        CustomerAssignment::Existing(customer) => Some(customer.phone.as_ref()),
        CustomerAssignment::New(details) => Some(details.phone.as_ref()),
        CustomerAssignment::Retain => None,
    }
}

fn map_write_error(error: WriteError, assignment: &CustomerAssignment) -> OrderRepositoryError {
    match error {
        WriteError::Missing(id) => OrderRepositoryError::not_found(id),
        WriteError::Malformed(message) => OrderRepositoryError::query(message),
        WriteError::Diesel(err) => match assignment_phone(assignment) {
            Some(phone) if is_phone_violation(&err) => OrderRepositoryError::duplicate_phone(phone),
            _ => map_diesel_error(err),
        },
    }
}

/// Write the order's customer and return the id to reference.
///
/// `None` means the assignment leaves the current reference untouched.
async fn write_customer(
    conn: &mut AsyncPgConnection,
    assignment: &CustomerAssignment,
) -> Result<Option<i64>, DieselError> {
    match assignment {
        CustomerAssignment::Retain => Ok(None),
        CustomerAssignment::Existing(customer) => {
            diesel::update(customers::table.find(customer.id.get()))
                .set((
                    customers::name.eq(customer.name.as_ref()),
                    customers::address.eq(customer.address.as_ref()),
                ))
                .execute(conn)
                .await?;
            Ok(Some(customer.id.get()))
        }
        CustomerAssignment::New(details) => diesel::insert_into(customers::table)
            .values(NewCustomerRow {
                name: details.name.as_ref(),
                phone: details.phone.as_ref(),
                address: details.address.as_ref(),
            })
            .returning(customers::id)
            .get_result(conn)
            .await
            .map(Some),
    }
}

async fn insert_items<'a>(
    conn: &mut AsyncPgConnection,
    order_id: i64,
    items: impl Iterator<Item = &'a OrderItem>,
) -> Result<(), WriteError> {
    let rows = items
        .map(|item| {
            Ok::<_, String>(NewOrderItemRow {
                order_id,
                product_code: item.product.code(),
                quantity: quantity_for_db(item.quantity)?,
                unit_price: item.unit_price,
                subtotal: item.subtotal,
            })
        })
        .collect::<Result<Vec<_>, String>>()
        .map_err(WriteError::Malformed)?;
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(order_items::table)
        .values(&rows)
        .execute(conn)
        .await?;
    Ok(())
}

/// Align stored items of `order_id` with `items`.
async fn sync_items(
    conn: &mut AsyncPgConnection,
    order_id: i64,
    items: &[OrderItem],
) -> Result<(), WriteError> {
    let kept: Vec<i64> = items
        .iter()
        .filter_map(|item| item.id.map(OrderItemId::get))
        .collect();
    diesel::delete(
        order_items::table
            .filter(order_items::order_id.eq(order_id))
            .filter(order_items::id.ne_all(kept)),
    )
    .execute(conn)
    .await?;

    for item in items {
        let Some(item_id) = item.id else { continue };
        let quantity = quantity_for_db(item.quantity).map_err(WriteError::Malformed)?;
        diesel::update(
            order_items::table
                .filter(order_items::id.eq(item_id.get()))
                .filter(order_items::order_id.eq(order_id)),
        )
        .set(OrderItemUpdate {
            product_code: item.product.code(),
            quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
        })
        .execute(conn)
        .await?;
    }

    insert_items(conn, order_id, items.iter().filter(|item| item.id.is_none())).await
}

/// Attach customers and items to loaded order rows, keeping row order.
async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<OrderRow>,
) -> Result<Vec<Order>, OrderRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut customer_ids: Vec<i64> = rows.iter().filter_map(|row| row.customer_id).collect();
    customer_ids.sort_unstable();
    customer_ids.dedup();

    let customers_by_id: HashMap<i64, Customer> = if customer_ids.is_empty() {
        HashMap::new()
    } else {
        let customer_rows: Vec<CustomerRow> = customers::table
            .filter(customers::id.eq_any(customer_ids))
            .select(CustomerRow::as_select())
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(
            customer_rows.into_iter().map(Customer::try_from),
            OrderRepositoryError::query,
        )?
        .into_iter()
        .map(|customer| (customer.id.get(), customer))
        .collect()
    };

    let item_rows: Vec<OrderItemRow> = order_items::table
        .filter(order_items::order_id.eq_any(order_ids))
        .select(OrderItemRow::as_select())
        .order_by(order_items::id.asc())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for row in item_rows {
        let order_id = row.order_id;
        let item = OrderItem::try_from(row).map_err(OrderRepositoryError::query)?;
        items_by_order.entry(order_id).or_default().push(item);
    }

    Ok(rows
        .into_iter()
        .map(|row| Order {
            id: Some(OrderId::new(row.id)),
            customer: row
                .customer_id
                .and_then(|customer_id| customers_by_id.get(&customer_id).cloned()),
            items: items_by_order.remove(&row.id).unwrap_or_default(),
            delivery_at: row.delivery_at,
            delivery_fee: row.delivery_fee,
            total: row.total,
        })
        .collect())
}

async fn load_order(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<Order>, OrderRepositoryError> {
    let row: Option<OrderRow> = orders::table
        .find(id)
        .select(OrderRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(assemble(conn, vec![row]).await?.pop())
}

async fn reload_written(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Order, OrderRepositoryError> {
    load_order(conn, id)
        .await?
        .ok_or_else(|| OrderRepositoryError::query(format!("order {id} vanished after write")))
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .select(OrderRow::as_select())
            .order_by((orders::delivery_at.desc().nulls_last(), orders::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        assemble(&mut conn, rows).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_order(&mut conn, id.get()).await
    }

    async fn find_by_item_id(
        &self,
        id: OrderItemId,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let order_id: Option<i64> = order_items::table
            .find(id.get())
            .select(order_items::order_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match order_id {
            Some(order_id) => load_order(&mut conn, order_id).await,
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        customer: &CustomerAssignment,
        order: &Order,
    ) -> Result<Order, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let order_id = conn
            .transaction(|conn| {
                async move {
                    let customer_id = write_customer(conn, customer).await?;
                    let order_id: i64 = diesel::insert_into(orders::table)
                        .values(NewOrderRow {
                            customer_id,
                            delivery_at: order.delivery_at,
                            delivery_fee: order.delivery_fee,
                            total: order.total,
                        })
                        .returning(orders::id)
                        .get_result(conn)
                        .await?;
                    insert_items(conn, order_id, order.items.iter()).await?;
                    Ok::<_, WriteError>(order_id)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, customer))?;
        reload_written(&mut conn, order_id).await
    }

    async fn save(
        &self,
        customer: &CustomerAssignment,
        order: &Order,
    ) -> Result<Order, OrderRepositoryError> {
        let Some(id) = order.id.map(OrderId::get) else {
            return Err(OrderRepositoryError::query("cannot save an order without id"));
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let current: Option<Option<i64>> = orders::table
                    .find(id)
                    .select(orders::customer_id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(current_customer) = current else {
                    return Err(WriteError::Missing(id));
                };
                let customer_id = write_customer(conn, customer)
                    .await?
                    .or(current_customer);

                diesel::update(orders::table.find(id))
                    .set(OrderUpdate {
                        customer_id,
                        delivery_at: order.delivery_at,
                        delivery_fee: order.delivery_fee,
                        total: order.total,
                    })
                    .execute(conn)
                    .await?;
                sync_items(conn, id, &order.items).await
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_write_error(err, customer))?;
        reload_written(&mut conn, id).await
    }

    async fn delete(&self, id: OrderId) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(orders::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
