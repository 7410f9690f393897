//! Menu Category Repository

use super::RepoResult;
use crate::db::models::MenuCategoryRow;
use shared::models::MenuCategory;
use shared::util::slugify;
use sqlx::{Sqlite, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuCategory>> {
    let rows = sqlx::query_as::<_, MenuCategoryRow>(
        "SELECT id, name, sort_order FROM menu_categories ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(MenuCategory::from).collect())
}

/// Look a category up by slug or by exact name
pub async fn find_by_key(pool: &SqlitePool, key: &str) -> RepoResult<Option<MenuCategory>> {
    let row = sqlx::query_as::<_, MenuCategoryRow>(
        "SELECT id, name, sort_order FROM menu_categories WHERE id = ?1 OR name = ?1 LIMIT 1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(MenuCategory::from))
}

/// Register `name` if it is new, appending it after the existing categories
pub async fn ensure<'e, E>(executor: E, name: &str) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT OR IGNORE INTO menu_categories (id, name, sort_order) \
         VALUES (?1, ?2, (SELECT COALESCE(MAX(sort_order), -1) + 1 FROM menu_categories))",
    )
    .bind(slugify(name))
    .bind(name)
    .execute(executor)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_ensure_is_idempotent_and_ordered() {
        let db = DbService::new_in_memory().await.unwrap();
        ensure(&db.pool, "Veg Starters").await.unwrap();
        ensure(&db.pool, "Tandoori Rotis").await.unwrap();
        ensure(&db.pool, "Veg Starters").await.unwrap();

        let all = find_all(&db.pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "veg-starters");
        assert_eq!(all[0].sort_order, 0);
        assert_eq!(all[1].name, "Tandoori Rotis");
        assert_eq!(all[1].sort_order, 1);
    }

    #[tokio::test]
    async fn test_find_by_key_accepts_slug_or_name() {
        let db = DbService::new_in_memory().await.unwrap();
        ensure(&db.pool, "Chinese Food").await.unwrap();

        let by_slug = find_by_key(&db.pool, "chinese-food").await.unwrap().unwrap();
        let by_name = find_by_key(&db.pool, "Chinese Food").await.unwrap().unwrap();
        assert_eq!(by_slug, by_name);
        assert!(find_by_key(&db.pool, "desserts").await.unwrap().is_none());
    }
}
