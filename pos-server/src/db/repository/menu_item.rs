//! Menu Item Repository
//!
//! Deletion is soft (`is_active = 0`); inactive rows are invisible to every
//! query here.

use super::{RepoError, RepoResult, category};
use crate::db::models::MenuItemRow;
use shared::models::{MenuItem, MenuItemUpdate};
use shared::order::money::to_f64;
use shared::util::now_millis;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, description, category, full_price, half_price, image, \
                       is_veg, available, preparation_time, created_at, updated_at";

async fn query_items(
    pool: &SqlitePool,
    filter: &str,
    bind: Option<&str>,
) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM menu_items WHERE is_active = 1 {filter} ORDER BY category, name"
    );
    let mut query = sqlx::query_as::<_, MenuItemRow>(&sql);
    if let Some(value) = bind {
        query = query.bind(value);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    query_items(pool, "", None).await
}

pub async fn find_available(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    query_items(pool, "AND available = 1", None).await
}

pub async fn find_by_category(pool: &SqlitePool, category: &str) -> RepoResult<Vec<MenuItem>> {
    query_items(pool, "AND category = ?", Some(category)).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_items WHERE id = ? AND is_active = 1");
    let row = sqlx::query_as::<_, MenuItemRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(MenuItem::from))
}

pub async fn count_active(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items WHERE is_active = 1")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn insert_row<'e, E>(executor: E, item: &MenuItem) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO menu_items (id, name, description, category, full_price, half_price, image, \
         is_veg, available, preparation_time, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(&item.category)
    .bind(to_f64(item.full_price))
    .bind(item.half_price.map(to_f64))
    .bind(&item.image)
    .bind(item.is_veg)
    .bind(item.available)
    .bind(i64::from(item.preparation_time))
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Insert a fully built item (id already assigned) and register its category
pub async fn create(pool: &SqlitePool, item: MenuItem) -> RepoResult<MenuItem> {
    let mut tx = pool.begin().await?;
    category::ensure(&mut *tx, &item.category).await?;
    insert_row(&mut *tx, &item).await?;
    tx.commit().await?;

    find_by_id(pool, item.id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

/// Insert many items in one transaction (menu seed)
pub async fn create_many(pool: &SqlitePool, items: &[MenuItem]) -> RepoResult<usize> {
    let mut tx = pool.begin().await?;
    for item in items {
        category::ensure(&mut *tx, &item.category).await?;
        insert_row(&mut *tx, item).await?;
    }
    tx.commit().await?;
    Ok(items.len())
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let mut item = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id}")))?;
    data.apply(&mut item, now_millis());

    let mut tx = pool.begin().await?;
    category::ensure(&mut *tx, &item.category).await?;
    let rows = sqlx::query(
        "UPDATE menu_items SET name = ?, description = ?, category = ?, full_price = ?, \
         half_price = ?, image = ?, is_veg = ?, available = ?, preparation_time = ?, updated_at = ? \
         WHERE id = ? AND is_active = 1",
    )
    .bind(&item.name)
    .bind(&item.description)
    .bind(&item.category)
    .bind(to_f64(item.full_price))
    .bind(item.half_price.map(to_f64))
    .bind(&item.image)
    .bind(item.is_veg)
    .bind(item.available)
    .bind(i64::from(item.preparation_time))
    .bind(item.updated_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id}")));
    }
    tx.commit().await?;

    Ok(item)
}

/// Flip the availability flag, returning the updated item
pub async fn toggle_availability(pool: &SqlitePool, id: i64) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_items SET available = 1 - available, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id}")))
}

/// Soft delete. Returns false when the item was already gone.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE menu_items SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use rust_decimal::Decimal;
    use shared::models::MenuItemCreate;

    fn payload(name: &str, category: &str, price: i64) -> MenuItemCreate {
        MenuItemCreate {
            name: name.to_string(),
            description: None,
            category: category.to_string(),
            full_price: Decimal::from(price),
            half_price: None,
            image: None,
            is_veg: true,
            available: None,
            preparation_time: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = DbService::new_in_memory().await.unwrap();
        let item = create(&db.pool, payload("Gobi Manchuria", "Veg Starters", 180).into_item(10, 1))
            .await
            .unwrap();

        assert_eq!(item.id, 10);
        assert_eq!(item.full_price, Decimal::from(180));
        assert_eq!(find_by_category(&db.pool, "Veg Starters").await.unwrap().len(), 1);
        assert_eq!(
            category::find_all(&db.pool).await.unwrap()[0].name,
            "Veg Starters"
        );
    }

    #[tokio::test]
    async fn test_toggle_filters_available() {
        let db = DbService::new_in_memory().await.unwrap();
        create(&db.pool, payload("Garlic Naan", "Tandoori Rotis", 45).into_item(1, 1))
            .await
            .unwrap();
        create(&db.pool, payload("Tomato Rice", "Chinese Food", 160).into_item(2, 1))
            .await
            .unwrap();

        let toggled = toggle_availability(&db.pool, 1).await.unwrap();
        assert!(!toggled.available);

        let available = find_available(&db.pool).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, 2);
        assert_eq!(find_all(&db.pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_item() {
        let db = DbService::new_in_memory().await.unwrap();
        create(&db.pool, payload("Kadai Chicken", "Indian Non-Veg Curries", 450).into_item(5, 1))
            .await
            .unwrap();

        assert!(delete(&db.pool, 5).await.unwrap());
        assert!(!delete(&db.pool, 5).await.unwrap());
        assert!(find_by_id(&db.pool, 5).await.unwrap().is_none());
        assert_eq!(count_active(&db.pool).await.unwrap(), 0);
        assert!(matches!(
            toggle_availability(&db.pool, 5).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_partial() {
        let db = DbService::new_in_memory().await.unwrap();
        create(&db.pool, payload("Dal Fry", "Indian Veg Curries", 120).into_item(3, 1))
            .await
            .unwrap();

        let update = MenuItemUpdate {
            full_price: Some(Decimal::from(130)),
            ..Default::default()
        };
        let item = super::update(&db.pool, 3, update).await.unwrap();
        assert_eq!(item.full_price, Decimal::from(130));
        assert_eq!(item.name, "Dal Fry");

        let stored = find_by_id(&db.pool, 3).await.unwrap().unwrap();
        assert_eq!(stored, item);
    }
}
