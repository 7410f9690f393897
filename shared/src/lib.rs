//! Shared types for the restaurant POS
//!
//! Domain core used by pos-server: menu and order models, the cart, the
//! order factory, the status workflow and the unified error system.
//! Nothing in this crate performs I/O.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
pub use models::{MenuCategory, MenuItem, Order, OrderDetails, OrderItem, OrderType};
pub use order::{Cart, OrderFactory, OrderStatus, OrderStatusMachine};
