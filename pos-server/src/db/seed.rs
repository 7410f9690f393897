//! Default menu, written on first start when the catalog is empty

use super::repository::{RepoError, RepoResult, category, menu_item};
use serde::Deserialize;
use shared::models::{MenuItem, MenuItemCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;
use validator::Validate;

const MENU_SEED: &str = include_str!("../../data/menu_seed.json");

#[derive(Debug, Deserialize)]
struct MenuSeed {
    categories: Vec<String>,
    items: Vec<MenuItemCreate>,
}

fn load_seed() -> RepoResult<(Vec<String>, Vec<MenuItem>)> {
    let seed: MenuSeed = serde_json::from_str(MENU_SEED)
        .map_err(|e| RepoError::Validation(format!("Invalid menu seed: {e}")))?;

    let now = now_millis();
    let mut items = Vec::with_capacity(seed.items.len());
    for payload in seed.items {
        payload
            .validate()
            .map_err(|e| RepoError::Validation(format!("Invalid seed item {}: {e}", payload.name)))?;
        items.push(payload.into_item(snowflake_id(), now));
    }
    Ok((seed.categories, items))
}

/// Seed the default menu if no active item exists. Returns the number of
/// items written.
pub async fn seed_menu_if_empty(pool: &SqlitePool) -> RepoResult<usize> {
    if menu_item::count_active(pool).await? > 0 {
        return Ok(0);
    }

    let (categories, items) = load_seed()?;
    for name in &categories {
        category::ensure(pool, name).await?;
    }
    let count = menu_item::create_many(pool, &items).await?;
    tracing::info!(items = count, categories = categories.len(), "Default menu seeded");
    Ok(count)
}
