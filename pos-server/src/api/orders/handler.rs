//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::{Order, OrderDetails};
use shared::order::OrderStatus;

use crate::core::ServerState;
use crate::orders::OrderLineRequest;
use crate::utils::AppResult;

/// 直接下单：菜品行 + 顾客信息 (平铺)
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLineRequest>,
    #[serde(flatten)]
    pub details: OrderDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub expected_version: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceParams {
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// GET /api/orders - 最新订单在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.list().await?))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get(&id).await?))
}

/// POST /api/orders - 直接下单 (不经过购物车)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state
        .orders
        .create_direct(&payload.items, &payload.details)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/orders/:id/status - 设置状态
///
/// 带 expectedVersion 时版本不符返回 409
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .update_status(&id, payload.status, payload.expected_version)
        .await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/advance - 推进到下一状态
pub async fn advance(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(params): Query<AdvanceParams>,
) -> AppResult<Json<Order>> {
    let order = state.orders.advance(&id, params.expected_version).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id - 幂等删除
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.orders.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
