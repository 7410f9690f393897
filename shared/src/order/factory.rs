//! Cart + customer details -> immutable Order

use super::cart::Cart;
use super::status::OrderStatus;
use crate::models::{Order, OrderDetails, OrderItem};
use crate::util::{non_blank, now_millis};
use thiserror::Error;

/// Checkout validation failures, reported in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter customer name")]
    MissingCustomerName,
    #[error("Please add at least one item")]
    EmptyCart,
    #[error("Please enter table number for dine-in orders")]
    MissingTableNumber,
}

/// `#` followed by the sequence, zero-padded to three digits
pub fn format_order_number(sequence: i64) -> String {
    format!("#{:03}", sequence)
}

pub struct OrderFactory;

impl OrderFactory {
    /// Pure check of the cart and customer details. The first failing rule
    /// wins: customer name, then cart contents, then dine-in table.
    pub fn validate(cart: &Cart, details: &OrderDetails) -> Result<(), ValidationError> {
        if details.customer_name.trim().is_empty() {
            return Err(ValidationError::MissingCustomerName);
        }
        if cart.item_count() == 0 {
            return Err(ValidationError::EmptyCart);
        }
        if details.order_type.requires_table()
            && non_blank(details.table_number.as_deref()).is_none()
        {
            return Err(ValidationError::MissingTableNumber);
        }
        Ok(())
    }

    /// Snapshot `cart` into a new order numbered from `sequence`.
    ///
    /// Does not persist and does not clear the cart.
    pub fn create_order(
        cart: &Cart,
        details: &OrderDetails,
        sequence: i64,
    ) -> Result<Order, ValidationError> {
        Self::validate(cart, details)?;

        let id = uuid::Uuid::new_v4().to_string();
        let items = cart
            .lines()
            .iter()
            .enumerate()
            .map(|(index, line)| OrderItem {
                id: format!("{}-{}", id, index),
                menu_item_id: Some(line.menu_item.id),
                name: line.menu_item.name.clone(),
                price: line.menu_item.price(),
                quantity: line.quantity,
                special_instructions: line.special_instructions.clone(),
            })
            .collect();

        let table_number = if details.order_type.requires_table() {
            non_blank(details.table_number.as_deref())
        } else {
            None
        };
        let now = now_millis();

        Ok(Order {
            order_number: format_order_number(sequence),
            customer_name: details.customer_name.trim().to_string(),
            customer_phone: non_blank(details.customer_phone.as_deref()),
            items,
            total: cart.total(),
            status: OrderStatus::New,
            order_type: details.order_type,
            table_number,
            notes: non_blank(details.notes.as_deref()),
            created_at: now,
            updated_at: now,
            version: 1,
            id,
        })
    }
}
