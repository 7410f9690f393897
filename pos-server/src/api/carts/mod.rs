//! Cart API 模块
//!
//! 服务端持有的购物车会话，结账时生成订单

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/carts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::open))
        .route("/{id}", get(handler::get_by_id).delete(handler::discard))
        .route("/{id}/items", post(handler::add_item))
        .route(
            "/{id}/items/{menu_item_id}",
            axum::routing::patch(handler::update_item).delete(handler::remove_item),
        )
        .route("/{id}/clear", post(handler::clear))
        .route("/{id}/checkout", post(handler::checkout))
}
