//! Menu catalog read-model
//!
//! Carts and direct orders only need to look items up; admin writes go
//! through `db::repository::menu_item`.

use crate::db::repository::{RepoError, menu_item};
use crate::utils::AppError;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::MenuItem;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Menu catalog unavailable: {0}")]
    Unavailable(String),
}

impl From<RepoError> for CatalogError {
    fn from(err: RepoError) -> Self {
        CatalogError::Unavailable(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::database(err.to_string())
    }
}

#[async_trait]
pub trait MenuCatalog: Send + Sync {
    /// Active items with `available = true`
    async fn list_available(&self) -> Result<Vec<MenuItem>, CatalogError>;

    /// Active item by id, available or not
    async fn get_by_id(&self, id: i64) -> Result<Option<MenuItem>, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct SqliteMenuCatalog {
    pool: SqlitePool,
}

impl SqliteMenuCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuCatalog for SqliteMenuCatalog {
    async fn list_available(&self) -> Result<Vec<MenuItem>, CatalogError> {
        Ok(menu_item::find_available(&self.pool).await?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<MenuItem>, CatalogError> {
        Ok(menu_item::find_by_id(&self.pool, id).await?)
    }
}

/// Fixed catalog held in memory
#[derive(Debug, Default)]
pub struct InMemoryMenuCatalog {
    items: RwLock<Vec<MenuItem>>,
}

impl InMemoryMenuCatalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Replace or add an item
    pub fn upsert(&self, item: MenuItem) {
        let mut items = self.items.write();
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
    }
}

#[async_trait]
impl MenuCatalog for InMemoryMenuCatalog {
    async fn list_available(&self) -> Result<Vec<MenuItem>, CatalogError> {
        Ok(self
            .items
            .read()
            .iter()
            .filter(|i| i.available)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<MenuItem>, CatalogError> {
        Ok(self.items.read().iter().find(|i| i.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::seed::seed_menu_if_empty;

    #[tokio::test]
    async fn test_sqlite_catalog_hides_unavailable_from_list() {
        let db = DbService::new_in_memory().await.unwrap();
        seed_menu_if_empty(&db.pool).await.unwrap();
        let catalog = SqliteMenuCatalog::new(db.pool.clone());

        let available = catalog.list_available().await.unwrap();
        let first = available[0].clone();
        menu_item::toggle_availability(&db.pool, first.id).await.unwrap();

        let after = catalog.list_available().await.unwrap();
        assert_eq!(after.len(), available.len() - 1);

        let fetched = catalog.get_by_id(first.id).await.unwrap().unwrap();
        assert!(!fetched.available);
        assert!(catalog.get_by_id(-1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_upsert_replaces_by_id() {
        let dal = MenuItem {
            id: 7,
            name: "Dal Tadka".to_string(),
            description: String::new(),
            category: "Veg Main Course".to_string(),
            full_price: rust_decimal::Decimal::from(180),
            half_price: None,
            image: String::new(),
            is_veg: true,
            available: true,
            preparation_time: 20,
            created_at: 0,
            updated_at: 0,
        };
        let catalog = InMemoryMenuCatalog::new(vec![dal.clone()]);

        catalog.upsert(MenuItem {
            available: false,
            ..dal.clone()
        });
        assert!(catalog.list_available().await.unwrap().is_empty());
        assert!(!catalog.get_by_id(7).await.unwrap().unwrap().available);

        catalog.upsert(MenuItem { id: 8, ..dal });
        let listed = catalog.list_available().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 8);
    }
}
