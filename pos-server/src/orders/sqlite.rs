//! SQLite-backed order store

use super::store::{OrderStore, StoreError, StoreResult};
use crate::db::repository::order as repo;
use async_trait::async_trait;
use shared::models::Order;
use shared::order::{OrderStatus, OrderStatusMachine};
use shared::util::now_millis;
use sqlx::SqlitePool;

#[derive(Debug, Clone)]
pub struct SqliteOrderStore {
    pool: SqlitePool,
}

impl SqliteOrderStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn next_order_sequence(&self) -> StoreResult<i64> {
        Ok(repo::next_order_sequence(&self.pool).await?)
    }

    async fn insert(&self, order: &Order) -> StoreResult<()> {
        repo::insert(&self.pool, order).await?;
        tracing::debug!(order_id = %order.id, order_number = %order.order_number, "Order persisted");
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(repo::find_by_id(&self.pool, id).await?)
    }

    async fn list(&self) -> StoreResult<Vec<Order>> {
        Ok(repo::find_all(&self.pool).await?)
    }

    async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        expected_version: Option<i64>,
    ) -> StoreResult<Order> {
        let (current, version) = repo::find_status(&self.pool, id)
            .await?
            .ok_or_else(|| StoreError::OrderNotFound(id.to_string()))?;

        if let Some(expected) = expected_version
            && expected != version
        {
            return Err(StoreError::VersionConflict {
                id: id.to_string(),
                expected,
                actual: version,
            });
        }
        OrderStatusMachine::check_transition(current, status)?;

        let swapped =
            repo::compare_and_set_status(&self.pool, id, status, version, now_millis()).await?;
        if !swapped {
            // Lost the race: report what is there now
            return match repo::find_status(&self.pool, id).await? {
                None => Err(StoreError::OrderNotFound(id.to_string())),
                Some((_, actual)) => Err(StoreError::VersionConflict {
                    id: id.to_string(),
                    expected: version,
                    actual,
                }),
            };
        }

        repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StoreError::OrderNotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(repo::delete(&self.pool, id).await?)
    }
}
