//! Menu Model

use crate::order::money::{is_valid_price, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PREPARATION_TIME: u32 = 15;

fn default_true() -> bool {
    true
}

fn default_preparation_time() -> u32 {
    DEFAULT_PREPARATION_TIME
}

fn validate_price(price: &Decimal) -> Result<(), validator::ValidationError> {
    if is_valid_price(*price) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("price_out_of_range"))
    }
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Category name (not normalized to an id)
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub full_price: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub half_price: Option<Decimal>,
    /// Image URL, may be empty
    #[serde(default)]
    pub image: String,
    pub is_veg: bool,
    #[serde(default = "default_true")]
    pub available: bool,
    /// Minutes
    #[serde(default = "default_preparation_time")]
    pub preparation_time: u32,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl MenuItem {
    /// Unit price charged for a cart line
    pub fn price(&self) -> Decimal {
        self.full_price
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_price"))]
    pub full_price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_price"))]
    pub half_price: Option<Decimal>,
    pub image: Option<String>,
    #[serde(default)]
    pub is_veg: bool,
    pub available: Option<bool>,
    #[validate(range(min = 1, max = 240))]
    pub preparation_time: Option<u32>,
}

impl MenuItemCreate {
    /// Build the entity with ids and timestamps assigned by the caller
    pub fn into_item(self, id: i64, now: i64) -> MenuItem {
        MenuItem {
            id,
            name: self.name.trim().to_string(),
            description: self.description.unwrap_or_default(),
            category: self.category.trim().to_string(),
            full_price: round_money(self.full_price),
            half_price: self.half_price.map(round_money),
            image: self.image.unwrap_or_default(),
            is_veg: self.is_veg,
            available: self.available.unwrap_or(true),
            preparation_time: self.preparation_time.unwrap_or(DEFAULT_PREPARATION_TIME),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_price"))]
    pub full_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_price"))]
    pub half_price: Option<Decimal>,
    pub image: Option<String>,
    pub is_veg: Option<bool>,
    pub available: Option<bool>,
    #[validate(range(min = 1, max = 240))]
    pub preparation_time: Option<u32>,
}

impl MenuItemUpdate {
    /// Apply the present fields onto `item`
    pub fn apply(self, item: &mut MenuItem, now: i64) {
        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(category) = self.category {
            item.category = category.trim().to_string();
        }
        if let Some(price) = self.full_price {
            item.full_price = round_money(price);
        }
        if let Some(price) = self.half_price {
            item.half_price = Some(round_money(price));
        }
        if let Some(image) = self.image {
            item.image = image;
        }
        if let Some(is_veg) = self.is_veg {
            item.is_veg = is_veg;
        }
        if let Some(available) = self.available {
            item.available = available;
        }
        if let Some(minutes) = self.preparation_time {
            item.preparation_time = minutes;
        }
        item.updated_at = now;
    }
}

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    /// Slug of the name, e.g. `veg-starters`
    pub id: String,
    pub name: String,
    pub sort_order: i32,
}
