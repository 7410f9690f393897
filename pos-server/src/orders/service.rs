//! Order orchestration: catalog -> cart -> factory -> store
//!
//! Writes run under a deadline and are never retried: a write that misses
//! its deadline is reported as `Indeterminate` and the caller decides what
//! to do. Reads are retried with exponential backoff on storage failures.

use super::store::{OrderStore, StoreError, StoreResult};
use crate::carts::CartSessions;
use crate::core::Config;
use crate::menu::MenuCatalog;
use crate::utils::error::validation_error;
use crate::utils::{AppError, AppResult};
use serde::Deserialize;
use shared::models::{Order, OrderDetails};
use shared::order::{Cart, OrderFactory, OrderStatus, OrderStatusMachine, TransitionError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

const READ_BACKOFF_BASE: Duration = Duration::from_millis(50);

/// One requested line of a direct (cart-less) order
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub menu_item_id: i64,
    /// 1..=MAX_LINE_QUANTITY
    #[validate(range(min = 1, max = 999))]
    pub quantity: u32,
    pub special_instructions: Option<String>,
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    catalog: Arc<dyn MenuCatalog>,
    write_timeout: Duration,
    read_attempts: u32,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("write_timeout", &self.write_timeout)
            .field("read_attempts", &self.read_attempts)
            .finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        catalog: Arc<dyn MenuCatalog>,
        write_timeout: Duration,
        read_attempts: u32,
    ) -> Self {
        Self {
            store,
            catalog,
            write_timeout,
            read_attempts: read_attempts.max(1),
        }
    }

    pub fn from_config(
        store: Arc<dyn OrderStore>,
        catalog: Arc<dyn MenuCatalog>,
        config: &Config,
    ) -> Self {
        Self::new(store, catalog, config.write_timeout(), config.read_retry_attempts)
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    pub fn catalog(&self) -> &Arc<dyn MenuCatalog> {
        &self.catalog
    }

    // ========== Writes ==========

    /// Validate, number, build and persist an order from `cart`.
    ///
    /// Validation runs before a sequence number is taken so rejected
    /// checkouts do not burn order numbers.
    pub async fn place_order(&self, cart: &Cart, details: &OrderDetails) -> AppResult<Order> {
        OrderFactory::validate(cart, details)?;

        let sequence = self
            .with_deadline("next_order_sequence", self.store.next_order_sequence())
            .await?;
        let order = OrderFactory::create_order(cart, details, sequence)?;
        self.with_deadline("insert", self.store.insert(&order)).await?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            items = order.item_count(),
            total = %order.total,
            order_type = %order.order_type,
            "Order placed"
        );
        Ok(order)
    }

    /// Place an order from a server-held cart. The cart only loses the lines
    /// that went into the order, and only once the order is stored. A second
    /// checkout of the same cart while this one runs is refused.
    pub async fn checkout(
        &self,
        sessions: &CartSessions,
        cart_id: Uuid,
        details: &OrderDetails,
    ) -> AppResult<Order> {
        let checkout = sessions.begin_checkout(cart_id)?;
        let order = self.place_order(checkout.cart(), details).await?;
        checkout.settle();
        Ok(order)
    }

    /// Build a cart from catalog lookups and place it
    pub async fn create_direct(
        &self,
        lines: &[OrderLineRequest],
        details: &OrderDetails,
    ) -> AppResult<Order> {
        for line in lines {
            line.validate()
                .map_err(|e| validation_error(e).with_detail("menu_item_id", line.menu_item_id))?;
        }

        let mut cart = Cart::new();
        for line in lines {
            let item = self
                .catalog
                .get_by_id(line.menu_item_id)
                .await?
                .ok_or_else(|| AppError::menu_item_not_found(line.menu_item_id))?;

            // Repeated ids merge into one line, still under the line cap
            cart.add_quantity(item, line.quantity)?;
            if line.special_instructions.is_some() {
                cart.set_instructions(line.menu_item_id, line.special_instructions.as_deref());
            }
        }
        self.place_order(&cart, details).await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        expected_version: Option<i64>,
    ) -> AppResult<Order> {
        let result = self
            .with_deadline(
                "update_status",
                self.store.update_status(id, status, expected_version),
            )
            .await;

        match &result {
            Ok(order) => tracing::info!(
                order_id = %id,
                status = %order.status,
                version = order.version,
                "Order status updated"
            ),
            Err(StoreError::VersionConflict { expected, actual, .. }) => tracing::warn!(
                order_id = %id,
                expected_version = expected,
                actual_version = actual,
                "Order status update lost a concurrent edit"
            ),
            Err(_) => {}
        }
        Ok(result?)
    }

    /// Move the order one step along the workflow, guarded by the version
    /// just read (or the caller's `expected_version`)
    pub async fn advance(&self, id: &str, expected_version: Option<i64>) -> AppResult<Order> {
        let current = self.get(id).await?;
        let next = OrderStatusMachine::next_status(current.status).ok_or(TransitionError {
            from: current.status,
            to: current.status,
        })?;
        self.update_status(id, next, Some(expected_version.unwrap_or(current.version)))
            .await
    }

    /// Idempotent delete
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let removed = self.with_deadline("delete", self.store.delete(id)).await?;
        if removed {
            tracing::info!(order_id = %id, "Order deleted");
        }
        Ok(removed)
    }

    // ========== Reads ==========

    pub async fn get(&self, id: &str) -> AppResult<Order> {
        self.with_retry("get", || self.store.get(id))
            .await?
            .ok_or_else(|| AppError::order_not_found(id))
    }

    pub async fn list(&self) -> AppResult<Vec<Order>> {
        Ok(self.with_retry("list", || self.store.list()).await?)
    }

    // ========== Helpers ==========

    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.write_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.write_timeout.as_millis() as u64,
                    "Write deadline elapsed, outcome unknown"
                );
                Err(StoreError::Indeterminate(format!(
                    "{operation} did not finish within {}ms",
                    self.write_timeout.as_millis()
                )))
            }
        }
    }

    async fn with_retry<T, F, Fut>(&self, operation: &'static str, mut op: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let mut attempt = 1;
        let mut delay = READ_BACKOFF_BASE;
        loop {
            match op().await {
                Err(err) if err.is_retryable() && attempt < self.read_attempts => {
                    tracing::warn!(operation, attempt, error = %err, "Read failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
