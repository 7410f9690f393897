//! Database row types
//!
//! Rows mirror the SQLite columns exactly (REAL money, INTEGER flags, TEXT
//! enums) and convert into the shared domain models.

use shared::models::{MenuCategory, MenuItem, Order, OrderItem};
use shared::order::money::to_decimal;
use shared::order::ParseEnumError;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MenuItemRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub full_price: f64,
    pub half_price: Option<f64>,
    pub image: String,
    pub is_veg: bool,
    pub available: bool,
    pub preparation_time: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            full_price: to_decimal(row.full_price),
            half_price: row.half_price.map(to_decimal),
            image: row.image,
            is_veg: row.is_veg,
            available: row.available,
            preparation_time: u32::try_from(row.preparation_time).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MenuCategoryRow {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
}

impl From<MenuCategoryRow> for MenuCategory {
    fn from(row: MenuCategoryRow) -> Self {
        MenuCategory {
            id: row.id,
            name: row.name,
            sort_order: i32::try_from(row.sort_order).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub total: f64,
    pub status: String,
    pub order_type: String,
    pub table_number: Option<String>,
    pub notes: Option<String>,
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub id: String,
    pub order_id: String,
    pub position: i64,
    pub menu_item_id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub special_instructions: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            menu_item_id: row.menu_item_id,
            name: row.name,
            price: to_decimal(row.price),
            quantity: u32::try_from(row.quantity).unwrap_or_default(),
            special_instructions: row.special_instructions,
        }
    }
}

impl OrderRow {
    /// Assemble the domain order; `items` must already be in position order
    pub fn into_order(self, items: Vec<OrderItemRow>) -> Result<Order, ParseEnumError> {
        Ok(Order {
            status: self.status.parse()?,
            order_type: self.order_type.parse()?,
            id: self.id,
            order_number: self.order_number,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            items: items.into_iter().map(OrderItem::from).collect(),
            total: to_decimal(self.total),
            table_number: self.table_number,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        })
    }
}
