//! Order persistence contract
//!
//! | Operation | Kind | Failure modes |
//! |-----------|------|---------------|
//! | `next_order_sequence` | write | `Failed` |
//! | `insert` | write | `Failed` |
//! | `get` / `list` | read | `Failed` |
//! | `update_status` | write | `OrderNotFound`, `IllegalTransition`, `VersionConflict`, `Failed` |
//! | `delete` | write | `Failed` (absence is not an error) |
//!
//! `Indeterminate` is produced by callers that put a deadline on writes.

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};
use async_trait::async_trait;
use shared::models::Order;
use shared::order::{OrderStatus, TransitionError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error(transparent)]
    IllegalTransition(#[from] TransitionError),

    #[error("Order {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        id: String,
        expected: i64,
        actual: i64,
    },

    /// Deadline elapsed; the write may or may not have been applied
    #[error("Outcome unknown: {0}")]
    Indeterminate(String),

    #[error("Storage failure: {0}")]
    Failed(String),
}

impl StoreError {
    /// Transient failures that a read may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Failed(_))
    }
}

impl From<RepoError> for StoreError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(id) => StoreError::OrderNotFound(id),
            other => StoreError::Failed(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::OrderNotFound(id) => AppError::order_not_found(id),
            StoreError::IllegalTransition(e) => e.into(),
            StoreError::VersionConflict {
                ref id,
                expected,
                actual,
            } => AppError::with_message(ErrorCode::VersionConflict, err.to_string())
                .with_detail("order_id", id.clone())
                .with_detail("expected_version", expected)
                .with_detail("actual_version", actual),
            StoreError::Indeterminate(msg) => AppError::indeterminate(msg),
            StoreError::Failed(msg) => AppError::database(msg),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Order storage backend
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Atomically allocate the next order number. Gaps are allowed (a number
    /// taken by a failed insert is not reused); duplicates are not.
    async fn next_order_sequence(&self) -> StoreResult<i64>;

    /// Persist the order and all of its items, or nothing
    async fn insert(&self, order: &Order) -> StoreResult<()>;

    async fn get(&self, id: &str) -> StoreResult<Option<Order>>;

    /// Newest first; ties go to the most recently inserted
    async fn list(&self) -> StoreResult<Vec<Order>>;

    /// Move `id` to `status` if the workflow allows it.
    ///
    /// With `expected_version` the write only happens when the stored version
    /// still matches; without it the version read just before the write is
    /// used. On success `updated_at` moves forward and `version` increments.
    async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        expected_version: Option<i64>,
    ) -> StoreResult<Order>;

    /// Remove the order and its items. Returns whether anything was removed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}
