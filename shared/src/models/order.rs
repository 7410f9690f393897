//! Order Model

use crate::order::status::{OrderStatus, ParseEnumError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Order Type
// ============================================================================

/// How the order is served
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    #[default]
    DineIn,
    Takeout,
    Delivery,
}

impl OrderType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeout => "takeout",
            OrderType::Delivery => "delivery",
        }
    }

    /// Only dine-in orders carry a table number
    pub const fn requires_table(&self) -> bool {
        matches!(self, OrderType::DineIn)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dine-in" => Ok(OrderType::DineIn),
            "takeout" => Ok(OrderType::Takeout),
            "delivery" => Ok(OrderType::Delivery),
            other => Err(ParseEnumError {
                kind: "order type",
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// Frozen line of a placed order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// `{order_id}-{index}`
    pub id: String,
    /// Weak reference, reporting only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_item_id: Option<i64>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Placed order
///
/// Everything except `status`, `updated_at` and `version` is fixed at
/// creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// `#001`, `#002`, ...
    pub order_number: String,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Starts at 1, bumped on every status write
    pub version: i64,
}

impl Order {
    /// Sum of item quantities
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |n, item| n.saturating_add(item.quantity))
    }
}

/// Customer metadata entered at checkout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(default)]
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub order_type: OrderType,
    pub table_number: Option<String>,
    pub notes: Option<String>,
}
