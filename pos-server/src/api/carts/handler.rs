//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Order, OrderDetails};
use uuid::Uuid;

use crate::carts::CartView;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub menu_item_id: i64,
}

/// 数量增减和/或备注；备注为空串表示清除
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub delta: Option<i32>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// 非法 UUID 与不存在的会话同样处理
fn cart_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::cart_not_found(raw))
}

/// POST /api/carts - 打开新购物车
pub async fn open(State(state): State<ServerState>) -> AppResult<(StatusCode, Json<CartView>)> {
    let id = state.carts.open();
    Ok((StatusCode::CREATED, Json(state.carts.view(id)?)))
}

/// GET /api/carts/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CartView>> {
    let id = cart_id(&id)?;
    Ok(Json(state.carts.view(id)?))
}

/// DELETE /api/carts/:id - 丢弃购物车
pub async fn discard(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = cart_id(&id)?;
    if !state.carts.discard(id) {
        return Err(AppError::cart_not_found(id.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/carts/:id/items - 加入一份菜品
pub async fn add_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<CartView>> {
    let id = cart_id(&id)?;
    // 先确认会话存在，再查菜单
    state.carts.view(id)?;

    let item = state
        .catalog
        .get_by_id(payload.menu_item_id)
        .await?
        .ok_or_else(|| AppError::menu_item_not_found(payload.menu_item_id))?;

    let view = state.carts.mutate(id, |cart| cart.add(item))?;
    Ok(Json(view))
}

/// PATCH /api/carts/:id/items/:menuItemId - 调整数量或备注
///
/// 数量减到 0 时移除该行；行不存在时不做任何改动
pub async fn update_item(
    State(state): State<ServerState>,
    Path((id, menu_item_id)): Path<(String, i64)>,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<CartView>> {
    let id = cart_id(&id)?;
    let view = state.carts.mutate(id, |cart| -> AppResult<()> {
        if let Some(delta) = payload.delta {
            cart.update_quantity(menu_item_id, delta)?;
        }
        if let Some(text) = payload.special_instructions.as_deref() {
            cart.set_instructions(menu_item_id, Some(text));
        }
        Ok(())
    })?;
    Ok(Json(view))
}

/// DELETE /api/carts/:id/items/:menuItemId - 移除整行
pub async fn remove_item(
    State(state): State<ServerState>,
    Path((id, menu_item_id)): Path<(String, i64)>,
) -> AppResult<Json<CartView>> {
    let id = cart_id(&id)?;
    let view = state.carts.mutate(id, |cart| -> AppResult<()> {
        cart.remove(menu_item_id);
        Ok(())
    })?;
    Ok(Json(view))
}

/// POST /api/carts/:id/clear - 清空
pub async fn clear(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CartView>> {
    let id = cart_id(&id)?;
    let view = state.carts.mutate(id, |cart| -> AppResult<()> {
        cart.clear();
        Ok(())
    })?;
    Ok(Json(view))
}

/// POST /api/carts/:id/checkout - 结账下单
pub async fn checkout(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(details): Json<OrderDetails>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let id = cart_id(&id)?;
    let order = state.orders.checkout(&state.carts, id, &details).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
