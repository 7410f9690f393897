//! In-memory shopping cart
//!
//! One line per distinct menu item, kept in the order items were first added.
//! Quantities never drop below 1: a line reduced to 0 is removed.

use super::money::{line_total, round_money};
use crate::models::MenuItem;
use crate::util::non_blank;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on one line's quantity
pub const MAX_LINE_QUANTITY: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("{name} is currently unavailable")]
    ItemUnavailable { menu_item_id: i64, name: String },

    #[error("at most {max} of one item per order")]
    QuantityLimit { menu_item_id: i64, max: u32 },
}

/// A menu item and how many of it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item: MenuItem,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl CartLine {
    pub fn total(&self) -> Decimal {
        line_total(self.menu_item.price(), self.quantity)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one of `item`. Unavailable items are rejected and leave the cart
    /// untouched.
    pub fn add(&mut self, item: MenuItem) -> Result<(), CartError> {
        self.add_quantity(item, 1)
    }

    /// Add `quantity` of `item` in one step. The resulting line may not
    /// exceed [`MAX_LINE_QUANTITY`]; on error the cart is unchanged.
    pub fn add_quantity(&mut self, item: MenuItem, quantity: u32) -> Result<(), CartError> {
        if !item.available {
            return Err(CartError::ItemUnavailable {
                menu_item_id: item.id,
                name: item.name,
            });
        }
        if quantity == 0 {
            return Ok(());
        }

        match self.position(item.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = capped(item.id, u64::from(line.quantity) + u64::from(quantity))?;
            }
            None => {
                let quantity = capped(item.id, u64::from(quantity))?;
                self.lines.push(CartLine {
                    menu_item: item,
                    quantity,
                    special_instructions: None,
                });
            }
        }
        Ok(())
    }

    /// Shift a line's quantity by `delta`, clamped at zero. Zero removes the
    /// line; unknown ids are ignored. Going above [`MAX_LINE_QUANTITY`] is an
    /// error and leaves the line as it was.
    pub fn update_quantity(&mut self, menu_item_id: i64, delta: i32) -> Result<(), CartError> {
        let Some(idx) = self.position(menu_item_id) else {
            return Ok(());
        };
        let next = i64::from(self.lines[idx].quantity) + i64::from(delta);
        if next <= 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = capped(menu_item_id, next.unsigned_abs())?;
        }
        Ok(())
    }

    /// Take up to `quantity` off a line, removing it when nothing is left
    pub fn reduce(&mut self, menu_item_id: i64, quantity: u32) {
        if let Some(idx) = self.position(menu_item_id) {
            let left = self.lines[idx].quantity.saturating_sub(quantity);
            if left == 0 {
                self.lines.remove(idx);
            } else {
                self.lines[idx].quantity = left;
            }
        }
    }

    pub fn remove(&mut self, menu_item_id: i64) {
        self.lines.retain(|line| line.menu_item.id != menu_item_id);
    }

    /// Attach or clear (blank text) special instructions on an existing line
    pub fn set_instructions(&mut self, menu_item_id: i64, text: Option<&str>) {
        if let Some(idx) = self.position(menu_item_id) {
            self.lines[idx].special_instructions = non_blank(text);
        }
    }

    pub fn total(&self) -> Decimal {
        round_money(self.lines.iter().map(CartLine::total).sum())
    }

    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.quantity))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, menu_item_id: i64) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.menu_item.id == menu_item_id)
    }

    fn position(&self, menu_item_id: i64) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.menu_item.id == menu_item_id)
    }
}

fn capped(menu_item_id: i64, quantity: u64) -> Result<u32, CartError> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q <= MAX_LINE_QUANTITY)
        .ok_or(CartError::QuantityLimit {
            menu_item_id,
            max: MAX_LINE_QUANTITY,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn menu_item(id: i64, name: &str, price: i64) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            description: String::new(),
            category: "Veg Starters".to_string(),
            full_price: Decimal::from(price),
            half_price: None,
            image: String::new(),
            is_veg: true,
            available: true,
            preparation_time: 15,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut cart = Cart::new();
        cart.add(menu_item(1, "Veg Manchuria", 160)).unwrap();
        cart.add(menu_item(2, "Garlic Naan", 45)).unwrap();
        cart.add(menu_item(1, "Veg Manchuria", 160)).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].menu_item.id, 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Decimal::from(365));
    }

    #[test]
    fn test_add_unavailable_item_is_rejected() {
        let mut cart = Cart::new();
        let mut item = menu_item(1, "Kadai Chicken", 450);
        item.available = false;

        let err = cart.add(item).unwrap_err();
        assert_eq!(
            err,
            CartError::ItemUnavailable {
                menu_item_id: 1,
                name: "Kadai Chicken".to_string()
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_by_negative_quantity_removes_line() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(menu_item(1, "Veg Manchuria", 160)).unwrap();
        }
        cart.update_quantity(1, -3).unwrap();
        assert!(cart.line(1).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_and_ignores_unknown() {
        let mut cart = Cart::new();
        cart.add(menu_item(1, "Veg Manchuria", 160)).unwrap();
        cart.update_quantity(1, 4).unwrap();
        assert_eq!(cart.line(1).unwrap().quantity, 5);

        cart.update_quantity(99, 1).unwrap();
        assert_eq!(cart.item_count(), 5);

        cart.update_quantity(1, -100).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_quantity_is_capped() {
        let mut cart = Cart::new();
        cart.add_quantity(menu_item(1, "Veg Manchuria", 160), MAX_LINE_QUANTITY)
            .unwrap();

        let over = CartError::QuantityLimit {
            menu_item_id: 1,
            max: MAX_LINE_QUANTITY,
        };
        assert_eq!(cart.add(menu_item(1, "Veg Manchuria", 160)), Err(over.clone()));
        assert_eq!(cart.update_quantity(1, i32::MAX), Err(over));
        assert_eq!(
            cart.add_quantity(menu_item(2, "Garlic Naan", 45), u32::MAX),
            Err(CartError::QuantityLimit {
                menu_item_id: 2,
                max: MAX_LINE_QUANTITY
            })
        );

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), MAX_LINE_QUANTITY);
        cart.update_quantity(1, -1).unwrap();
        assert_eq!(cart.item_count(), MAX_LINE_QUANTITY - 1);
    }

    #[test]
    fn test_reduce_never_underflows() {
        let mut cart = Cart::new();
        cart.add_quantity(menu_item(1, "Veg Manchuria", 160), 3).unwrap();
        cart.reduce(1, 2);
        assert_eq!(cart.line(1).unwrap().quantity, 1);
        cart.reduce(1, u32::MAX);
        assert!(cart.is_empty());
        cart.reduce(1, 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(menu_item(1, "Veg Manchuria", 160)).unwrap();
        cart.add(menu_item(2, "Garlic Naan", 45)).unwrap();

        cart.remove(1);
        cart.remove(1);
        assert_eq!(cart.lines().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_set_instructions() {
        let mut cart = Cart::new();
        cart.add(menu_item(1, "Veg Manchuria", 160)).unwrap();

        cart.set_instructions(1, Some(" extra spicy "));
        assert_eq!(
            cart.line(1).unwrap().special_instructions.as_deref(),
            Some("extra spicy")
        );

        cart.set_instructions(1, Some("  "));
        assert!(cart.line(1).unwrap().special_instructions.is_none());

        cart.set_instructions(2, Some("ignored"));
        assert!(cart.line(2).is_none());
    }

    #[test]
    fn test_random_operations_keep_invariants() {
        let items: Vec<MenuItem> = (1..=5)
            .map(|id| menu_item(id, &format!("Item {id}"), id * 37))
            .collect();
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let mut cart = Cart::new();
            for _ in 0..50 {
                let item = &items[rng.gen_range(0..items.len())];
                match rng.gen_range(0..3) {
                    0 => cart.add(item.clone()).unwrap(),
                    1 => cart.update_quantity(item.id, rng.gen_range(-4..=4)).unwrap(),
                    _ => cart.remove(item.id),
                }

                let expected: Decimal = cart
                    .lines()
                    .iter()
                    .map(|l| l.menu_item.full_price * Decimal::from(l.quantity))
                    .sum();
                assert_eq!(cart.total(), expected);
                assert!(cart.total() >= Decimal::ZERO);
                assert!(cart.lines().iter().all(|l| l.quantity >= 1));

                let mut ids: Vec<i64> = cart.lines().iter().map(|l| l.menu_item.id).collect();
                ids.sort_unstable();
                ids.dedup();
                assert_eq!(ids.len(), cart.lines().len());
            }
        }
    }
}
