//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::util::{now_millis, snowflake_id};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{RepoError, category, menu_item};
use crate::utils::error::validation_error;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 菜品不存在时返回 MenuItemNotFound，而非通用 NotFound
fn item_error(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound(_) => AppError::menu_item_not_found(id),
        other => other.into(),
    }
}

/// GET /api/menu - 获取全部菜品 (含不可售)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let items = menu_item::find_all(state.pool()).await?;
    Ok(Json(items))
}

/// GET /api/menu/available - 获取可售菜品
pub async fn list_available(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let items = state.catalog.list_available().await?;
    Ok(Json(items))
}

/// GET /api/menu/categories - 获取所有分类
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<MenuCategory>>> {
    let categories = category::find_all(state.pool()).await?;
    Ok(Json(categories))
}

/// GET /api/menu/category/:category - 按分类获取菜品
///
/// 路径参数可以是分类 id (slug) 或分类名
pub async fn list_by_category(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let found = category::find_by_key(state.pool(), &key)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {key} not found"))
        })?;
    let items = menu_item::find_by_category(state.pool(), &found.name).await?;
    Ok(Json(items))
}

/// GET /api/menu/:id - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_item::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::menu_item_not_found(id))?;
    Ok(Json(item))
}

/// POST /api/menu - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    payload.validate().map_err(validation_error)?;

    let item = payload.into_item(snowflake_id(), now_millis());
    let item = menu_item::create(state.pool(), item).await?;
    tracing::info!(menu_item_id = item.id, name = %item.name, "Menu item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    payload.validate().map_err(validation_error)?;

    let item = menu_item::update(state.pool(), id, payload)
        .await
        .map_err(item_error(id))?;
    tracing::info!(menu_item_id = id, "Menu item updated");

    Ok(Json(item))
}

/// POST /api/menu/:id/toggle - 切换可售状态
pub async fn toggle(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_item::toggle_availability(state.pool(), id)
        .await
        .map_err(item_error(id))?;
    tracing::info!(menu_item_id = id, available = item.available, "Menu item availability toggled");

    Ok(Json(item))
}

/// DELETE /api/menu/:id - 删除菜品 (软删除)
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !menu_item::delete(state.pool(), id).await? {
        return Err(AppError::menu_item_not_found(id));
    }
    tracing::info!(menu_item_id = id, "Menu item deleted");
    Ok(StatusCode::NO_CONTENT)
}
