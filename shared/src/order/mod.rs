//! Order core
//!
//! - [`cart`]: per-session shopping cart and totals
//! - [`factory`]: checkout validation and order construction
//! - [`status`]: the `new -> preparing -> ready -> completed` workflow
//! - [`money`]: decimal helpers

pub mod cart;
pub mod factory;
pub mod money;
pub mod status;

pub use cart::{Cart, CartError, CartLine, MAX_LINE_QUANTITY};
pub use factory::{OrderFactory, ValidationError, format_order_number};
pub use status::{OrderStatus, OrderStatusMachine, ParseEnumError, TransitionError};

use crate::error::{AppError, ErrorCode};

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match &err {
            CartError::ItemUnavailable { menu_item_id, .. } => {
                let id = *menu_item_id;
                AppError::with_message(ErrorCode::ItemUnavailable, err.to_string())
                    .with_detail("menu_item_id", id)
            }
            CartError::QuantityLimit { menu_item_id, max } => {
                let (id, max) = (*menu_item_id, *max);
                AppError::with_message(ErrorCode::ValueOutOfRange, err.to_string())
                    .with_detail("menu_item_id", id)
                    .with_detail("max", max)
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::MissingCustomerName => ErrorCode::MissingCustomerName,
            ValidationError::EmptyCart => ErrorCode::EmptyCart,
            ValidationError::MissingTableNumber => ErrorCode::MissingTableNumber,
        };
        AppError::new(code)
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::with_message(ErrorCode::IllegalTransition, err.to_string())
            .with_detail("from", err.from.as_str())
            .with_detail("to", err.to.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_domain_errors_map_to_codes() {
        let err: AppError = ValidationError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);

        let err: AppError = TransitionError {
            from: OrderStatus::New,
            to: OrderStatus::Completed,
        }
        .into();
        assert_eq!(err.code, ErrorCode::IllegalTransition);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err: AppError = CartError::ItemUnavailable {
            menu_item_id: 5,
            name: "Garlic Naan".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ItemUnavailable);
        assert_eq!(err.http_status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: AppError = CartError::QuantityLimit {
            menu_item_id: 5,
            max: MAX_LINE_QUANTITY,
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.details.unwrap()["max"], 999);
    }
}
