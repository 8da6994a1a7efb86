//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Customer directory. `phone` is unique.
    customers (id) {
        id -> Int8,
        name -> Varchar,
        phone -> Varchar,
        address -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Order headers. `customer_id` is nulled when the customer is deleted.
    orders (id) {
        id -> Int8,
        customer_id -> Nullable<Int8>,
        delivery_at -> Nullable<Timestamp>,
        delivery_fee -> Nullable<Numeric>,
        total -> Numeric,
    }
}

diesel::table! {
    /// Order lines, at most one per `(order_id, product_code)`.
    order_items (id) {
        id -> Int8,
        order_id -> Int8,
        product_code -> Varchar,
        quantity -> Int4,
        unit_price -> Numeric,
        subtotal -> Numeric,
    }
}

diesel::table! {
    /// Back-office accounts allowed to log in.
    user_accounts (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Text,
    }
}

diesel::joinable!(orders -> customers (customer_id));
diesel::joinable!(order_items -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(customers, orders, order_items, user_accounts);
