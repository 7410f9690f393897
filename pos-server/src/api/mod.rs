//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`menu`] - 菜单查询与管理
//! - [`carts`] - 购物车会话
//! - [`orders`] - 订单

pub mod carts;
pub mod health;
pub mod menu;
pub mod orders;

use crate::core::ServerState;
use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(
        target: "http_access",
        elapsed_ms = start.elapsed().as_millis() as u64,
        "{} {} {}",
        method,
        uri,
        status
    );

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(carts::router())
        .merge(orders::router())
}

/// Router with state and middleware applied, ready to serve
pub fn build_router(state: ServerState) -> Router {
    build_app().with_state(state).layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(log_request))
            .layer(CorsLayer::permissive()),
    )
}
