//! Order Repository
//!
//! Orders and their items are written together in one transaction; items are
//! removed by `ON DELETE CASCADE`.

use super::{RepoError, RepoResult};
use crate::db::models::{OrderItemRow, OrderRow};
use shared::models::Order;
use shared::order::OrderStatus;
use shared::order::money::to_f64;
use sqlx::SqlitePool;
use std::collections::HashMap;

const ORDER_COLUMNS: &str = "id, order_number, customer_name, customer_phone, total, status, \
                             order_type, table_number, notes, version, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, order_id, position, menu_item_id, name, price, quantity, special_instructions";

const ORDER_NUMBER_SEQUENCE: &str = "order_number";

/// Atomically increment and return the order number counter
pub async fn next_order_sequence(pool: &SqlitePool) -> RepoResult<i64> {
    let value: i64 = sqlx::query_scalar(
        "INSERT INTO order_sequence (name, value) VALUES (?, 1) \
         ON CONFLICT(name) DO UPDATE SET value = value + 1 \
         RETURNING value",
    )
    .bind(ORDER_NUMBER_SEQUENCE)
    .fetch_one(pool)
    .await?;
    Ok(value)
}

pub async fn insert(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, order_number, customer_name, customer_phone, total, status, \
         order_type, table_number, notes, version, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(&order.order_number)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(to_f64(order.total))
    .bind(order.status.as_str())
    .bind(order.order_type.as_str())
    .bind(&order.table_number)
    .bind(&order.notes)
    .bind(order.version)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *tx)
    .await?;

    for (position, item) in order.items.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, position, menu_item_id, name, price, quantity, \
             special_instructions) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&order.id)
        .bind(position as i64)
        .bind(item.menu_item_id)
        .bind(&item.name)
        .bind(to_f64(item.price))
        .bind(i64::from(item.quantity))
        .bind(&item.special_instructions)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Order and its items, read in one transaction so a concurrent delete or
/// insert cannot split them
pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let Some(row) = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(None);
    };

    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ? ORDER BY position");
    let items = sqlx::query_as::<_, OrderItemRow>(&sql)
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(row.into_order(items)?))
}

/// All orders, newest first. Orders created in the same millisecond come
/// back most recently inserted first.
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, rowid DESC");
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .fetch_all(&mut *tx)
        .await?;

    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items ORDER BY order_id, position");
    let mut items_by_order: HashMap<String, Vec<OrderItemRow>> = HashMap::new();
    for item in sqlx::query_as::<_, OrderItemRow>(&sql)
        .fetch_all(&mut *tx)
        .await?
    {
        items_by_order
            .entry(item.order_id.clone())
            .or_default()
            .push(item);
    }
    tx.commit().await?;

    rows.into_iter()
        .map(|row| {
            let items = items_by_order.remove(&row.id).unwrap_or_default();
            row.into_order(items).map_err(RepoError::from)
        })
        .collect()
}

/// Current `(status, version)` of an order
pub async fn find_status(pool: &SqlitePool, id: &str) -> RepoResult<Option<(OrderStatus, i64)>> {
    let row: Option<(String, i64)> =
        sqlx::query_as("SELECT status, version FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match row {
        Some((status, version)) => Ok(Some((status.parse()?, version))),
        None => Ok(None),
    }
}

/// Compare-and-swap status write. Returns false when `expected_version` no
/// longer matches (or the order is gone).
///
/// `updated_at` always moves forward, even within the creation millisecond.
pub async fn compare_and_set_status(
    pool: &SqlitePool,
    id: &str,
    status: OrderStatus,
    expected_version: i64,
    updated_at: i64,
) -> RepoResult<bool> {
    let result = sqlx::query(
        "UPDATE orders SET status = ?, updated_at = MAX(?, updated_at + 1), version = version + 1 \
         WHERE id = ? AND version = ?",
    )
    .bind(status.as_str())
    .bind(updated_at)
    .bind(id)
    .bind(expected_version)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Hard delete; items go with the order
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
