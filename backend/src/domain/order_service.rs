//! Order domain service.
//!
//! Implements the order driving ports ([`OrderCommand`], [`OrderQuery`] and
//! [`OrderItemCommand`]) on top of the order and customer repositories. The
//! service resolves customers, runs the pure aggregate algorithms and hands
//! the finished aggregate to the repository, which writes it atomically.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::customer_service::{duplicate_phone_error, map_customer_repository_error};
use crate::domain::ports::{
    CustomerRepository, OrderCommand, OrderItemCommand, OrderItemRecord, OrderQuery,
    OrderRepository, OrderRepositoryError,
};
use crate::domain::{
    AmountOverflowError, Customer, CustomerAssignment, CustomerReference, Error, MAX_AMOUNT,
    Order, OrderFilter, OrderId, OrderItem, OrderItemDraft, OrderItemId, OrderSearchResult,
    OrderSubmission, Product, ensure_distinct_products, reconcile,
};

/// Order service implementing the order driving ports.
#[derive(Clone)]
pub struct OrderService<O, C> {
    orders: Arc<O>,
    customers: Arc<C>,
}

impl<O, C> OrderService<O, C> {
    /// Create a new service with the given repositories.
    pub fn new(orders: Arc<O>, customers: Arc<C>) -> Self {
        Self { orders, customers }
    }
}

fn map_order_repository_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
        OrderRepositoryError::DuplicatePhone { phone } => duplicate_phone_error(&phone),
        OrderRepositoryError::NotFound { id } => order_not_found(OrderId::new(id)),
    }
}

pub(crate) fn order_not_found(id: OrderId) -> Error {
    Error::not_found(format!("Pedido não encontrado com id: {id}"))
}

pub(crate) fn item_not_found(id: OrderItemId) -> Error {
    Error::not_found(format!("Item não encontrado com id: {id}"))
}

fn missing_customer() -> Error {
    Error::invalid_request("O pedido precisa de um cliente.").with_details(json!({
        "field": "customer",
        "code": "missing",
    }))
}

fn duplicate_product(product: Product) -> Error {
    Error::invalid_request(format!("O produto {product} aparece mais de uma vez no pedido."))
        .with_details(json!({
            "field": "items",
            "code": "duplicate_product",
            "value": product.code(),
        }))
}

fn amount_too_large(_: AmountOverflowError) -> Error {
    Error::invalid_request(format!("O valor do pedido excede o máximo de {MAX_AMOUNT}."))
        .with_details(json!({
            "field": "total",
            "code": "too_large",
            "value": MAX_AMOUNT.to_string(),
        }))
}

fn validate_submission(submission: &OrderSubmission) -> Result<&CustomerReference, Error> {
    ensure_distinct_products(&submission.items).map_err(|err| duplicate_product(err.product))?;
    submission.customer.as_ref().ok_or_else(missing_customer)
}

fn attach(order: &mut Order, assignment: &CustomerAssignment) {
    if let CustomerAssignment::Existing(customer) = assignment {
        order.customer = Some(customer.clone());
    }
}

fn record_for(order: &Order, pick: impl Fn(&OrderItem) -> bool) -> Result<OrderItemRecord, Error> {
    let order_id = order
        .id
        .ok_or_else(|| Error::internal("persisted order has no id"))?;
    let item = order
        .items
        .iter()
        .find(|item| pick(item))
        .cloned()
        .ok_or_else(|| Error::internal("persisted order lost the written item"))?;
    Ok(OrderItemRecord { order_id, item })
}

impl<O, C> OrderService<O, C>
where
    O: OrderRepository,
    C: CustomerRepository,
{
    async fn load(&self, id: OrderId) -> Result<Order, Error> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(map_order_repository_error)?
            .ok_or_else(|| order_not_found(id))
    }

    async fn load_by_item(&self, id: OrderItemId) -> Result<Order, Error> {
        self.orders
            .find_by_item_id(id)
            .await
            .map_err(map_order_repository_error)?
            .ok_or_else(|| item_not_found(id))
    }

    /// Customer lookup by explicit id, falling back to phone.
    async fn lookup_customer(
        &self,
        reference: &CustomerReference,
    ) -> Result<Option<Customer>, Error> {
        let found = match reference.id {
            Some(id) => self.customers.find_by_id(id).await,
            None => self.customers.find_by_phone(&reference.details.phone).await,
        };
        found.map_err(map_customer_repository_error)
    }

    async fn save(&self, assignment: &CustomerAssignment, order: &Order) -> Result<Order, Error> {
        self.orders
            .save(assignment, order)
            .await
            .map_err(map_order_repository_error)
    }
}

#[async_trait]
impl<O, C> OrderCommand for OrderService<O, C>
where
    O: OrderRepository,
    C: CustomerRepository,
{
    async fn submit_new_order(&self, submission: OrderSubmission) -> Result<Order, Error> {
        let reference = validate_submission(&submission)?;
        let found = self
            .customers
            .find_by_phone(&reference.details.phone)
            .await
            .map_err(map_customer_repository_error)?;
        let assignment = CustomerAssignment::resolve(found, &reference.details);

        let mut order = Order::from_drafts(
            &submission.items,
            submission.delivery_at,
            submission.delivery_fee,
        )
        .map_err(amount_too_large)?;
        attach(&mut order, &assignment);

        let created = self
            .orders
            .create(&assignment, &order)
            .await
            .map_err(map_order_repository_error)?;
        info!(
            order_id = ?created.id.map(OrderId::get),
            new_customer = matches!(assignment, CustomerAssignment::New(_)),
            total = %created.total,
            "order created"
        );
        Ok(created)
    }

    async fn reconcile(&self, id: OrderId, submission: OrderSubmission) -> Result<Order, Error> {
        let reference = validate_submission(&submission)?;
        let mut order = self.load(id).await?;

        let found = self.lookup_customer(reference).await?;
        let assignment = CustomerAssignment::resolve(found, &reference.details);
        attach(&mut order, &assignment);
        reconcile(&mut order, &submission).map_err(amount_too_large)?;

        let saved = self.save(&assignment, &order).await?;
        info!(order_id = %id, items = saved.items.len(), total = %saved.total, "order reconciled");
        Ok(saved)
    }

    async fn delete(&self, id: OrderId) -> Result<(), Error> {
        let deleted = self
            .orders
            .delete(id)
            .await
            .map_err(map_order_repository_error)?;
        if !deleted {
            return Err(order_not_found(id));
        }
        info!(order_id = %id, "order deleted");
        Ok(())
    }
}

#[async_trait]
impl<O, C> OrderQuery for OrderService<O, C>
where
    O: OrderRepository,
    C: CustomerRepository,
{
    async fn list(&self) -> Result<Vec<Order>, Error> {
        let orders = self
            .orders
            .list()
            .await
            .map_err(map_order_repository_error)?;
        Ok(orders.into_iter().map(Order::without_empty_items).collect())
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>, Error> {
        let order = self
            .orders
            .find_by_id(id)
            .await
            .map_err(map_order_repository_error)?;
        Ok(order.map(Order::without_empty_items))
    }

    async fn detail_grid(&self, id: OrderId) -> Result<Option<Order>, Error> {
        let order = self
            .orders
            .find_by_id(id)
            .await
            .map_err(map_order_repository_error)?;
        Ok(order.map(|mut order| {
            order.fill_missing_items();
            order
        }))
    }

    async fn search(&self, filter: OrderFilter) -> Result<OrderSearchResult, Error> {
        let orders = self
            .orders
            .list()
            .await
            .map_err(map_order_repository_error)?;
        Ok(filter.apply(&orders))
    }

    async fn list_items(&self) -> Result<Vec<OrderItemRecord>, Error> {
        let orders = self
            .orders
            .list()
            .await
            .map_err(map_order_repository_error)?;
        let mut records: Vec<OrderItemRecord> = orders
            .into_iter()
            .filter_map(|order| order.id.map(|order_id| (order_id, order.items)))
            .flat_map(|(order_id, items)| {
                items
                    .into_iter()
                    .map(move |item| OrderItemRecord { order_id, item })
            })
            .collect();
        records.sort_by_key(|record| record.item.id);
        Ok(records)
    }

    async fn find_item(&self, id: OrderItemId) -> Result<Option<OrderItemRecord>, Error> {
        let order = self
            .orders
            .find_by_item_id(id)
            .await
            .map_err(map_order_repository_error)?;
        let Some(order) = order else {
            return Ok(None);
        };
        if order.item_by_id(id).is_none() {
            return Ok(None);
        }
        record_for(&order, |item| item.id == Some(id)).map(Some)
    }
}

#[async_trait]
impl<O, C> OrderItemCommand for OrderService<O, C>
where
    O: OrderRepository,
    C: CustomerRepository,
{
    async fn add_item(
        &self,
        order_id: OrderId,
        draft: OrderItemDraft,
    ) -> Result<OrderItemRecord, Error> {
        let mut order = self.load(order_id).await?;
        if order.item_for(draft.product).is_some() {
            return Err(duplicate_product(draft.product));
        }
        order
            .items
            .push(OrderItem::from_draft(&draft).map_err(amount_too_large)?);
        order.recompute_total().map_err(amount_too_large)?;

        let saved = self.save(&CustomerAssignment::Retain, &order).await?;
        info!(order_id = %order_id, product = %draft.product, total = %saved.total, "order item added");
        record_for(&saved, |item| item.product == draft.product)
    }

    async fn update_item(
        &self,
        id: OrderItemId,
        draft: OrderItemDraft,
    ) -> Result<OrderItemRecord, Error> {
        let mut order = self.load_by_item(id).await?;
        let clash = order
            .item_for(draft.product)
            .is_some_and(|other| other.id != Some(id));
        if clash {
            return Err(duplicate_product(draft.product));
        }
        let item = order
            .items
            .iter_mut()
            .find(|item| item.id == Some(id))
            .ok_or_else(|| item_not_found(id))?;
        item.product = draft.product;
        item.quantity = draft.quantity;
        item.unit_price = draft.resolved_unit_price();
        order.recompute_total().map_err(amount_too_large)?;

        let saved = self.save(&CustomerAssignment::Retain, &order).await?;
        info!(item_id = %id, total = %saved.total, "order item updated");
        record_for(&saved, |item| item.id == Some(id))
    }

    async fn remove_item(&self, id: OrderItemId) -> Result<(), Error> {
        let mut order = self.load_by_item(id).await?;
        order.items.retain(|item| item.id != Some(id));
        order.recompute_total().map_err(amount_too_large)?;

        let saved = self.save(&CustomerAssignment::Retain, &order).await?;
        info!(item_id = %id, total = %saved.total, "order item removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
