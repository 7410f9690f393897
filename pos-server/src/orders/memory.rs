//! In-memory order store for tests and `--memory` runs

use super::store::{OrderStore, StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::Order;
use shared::order::{OrderStatus, OrderStatusMachine};
use shared::util::now_millis;

#[derive(Debug, Default)]
struct Inner {
    /// Insertion order
    orders: Vec<Order>,
    sequence: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    inner: RwLock<Inner>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn next_order_sequence(&self) -> StoreResult<i64> {
        let mut inner = self.inner.write();
        inner.sequence += 1;
        Ok(inner.sequence)
    }

    async fn insert(&self, order: &Order) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner
            .orders
            .iter()
            .any(|o| o.id == order.id || o.order_number == order.order_number)
        {
            return Err(StoreError::Failed(format!(
                "Duplicate order {} ({})",
                order.id, order.order_number
            )));
        }
        inner.orders.push(order.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.inner.read().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.inner.read().orders.iter().rev().cloned().collect();
        // Stable sort keeps reverse insertion order for equal timestamps
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        expected_version: Option<i64>,
    ) -> StoreResult<Order> {
        let mut inner = self.inner.write();
        let order = inner
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::OrderNotFound(id.to_string()))?;

        if let Some(expected) = expected_version
            && expected != order.version
        {
            return Err(StoreError::VersionConflict {
                id: id.to_string(),
                expected,
                actual: order.version,
            });
        }
        OrderStatusMachine::check_transition(order.status, status)?;

        order.status = status;
        order.updated_at = now_millis().max(order.updated_at + 1);
        order.version += 1;
        Ok(order.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        let before = inner.orders.len();
        inner.orders.retain(|o| o.id != id);
        Ok(inner.orders.len() < before)
    }
}
