//! `AppError` and the JSON body it renders to

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error carried to the HTTP boundary.
///
/// Domain errors (`CartError`, `ValidationError`, `TransitionError`, store and
/// catalog errors) all convert into this. `code` picks the HTTP status,
/// `details` holds machine-readable context such as the offending id.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's stock message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one `details` entry, replacing any previous value for `key`
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{resource} not found"))
            .with_detail("resource", resource)
    }

    pub fn order_not_found(order_id: impl Into<String>) -> Self {
        let id = order_id.into();
        Self::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
            .with_detail("order_id", id)
    }

    pub fn menu_item_not_found(menu_item_id: i64) -> Self {
        Self::with_message(
            ErrorCode::MenuItemNotFound,
            format!("Menu item {menu_item_id} not found"),
        )
        .with_detail("menu_item_id", menu_item_id)
    }

    pub fn cart_not_found(cart_id: impl Into<String>) -> Self {
        let id = cart_id.into();
        Self::with_message(ErrorCode::CartNotFound, format!("Cart {id} not found"))
            .with_detail("cart_id", id)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Write deadline elapsed; the write may or may not have landed
    pub fn indeterminate(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TimeoutError, msg)
    }

    /// Unique constraint hit
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    pub fn is_system(&self) -> bool {
        self.code.category() == ErrorCategory::System
    }
}

/// JSON body of every error response
///
/// ```json
/// { "code": 4011, "message": "...", "details": { "order_id": "..." } }
/// ```
///
/// Successful responses are the resource itself, without an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.is_system() {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }
        (self.http_status(), axum::Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_message() {
        let err = AppError::new(ErrorCode::EmptyCart);
        assert_eq!(err.message, "Please add at least one item");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::validation("Invalid fields: fullPrice")
            .with_detail("fullPrice", "price")
            .with_detail("name", "length");
        let details = err.details.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details["fullPrice"], "price");
    }

    #[test]
    fn test_lookup_errors_carry_ids() {
        let err = AppError::order_not_found("abc");
        assert_eq!(err.to_string(), "Order abc not found");
        assert_eq!(err.details.unwrap()["order_id"], "abc");

        let err = AppError::menu_item_not_found(42);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.details.unwrap()["menu_item_id"], 42);
    }

    #[test]
    fn test_only_infrastructure_errors_are_system() {
        assert!(AppError::indeterminate("insert").is_system());
        assert!(AppError::database("locked").is_system());
        assert!(!AppError::cart_not_found("x").is_system());
        assert_eq!(
            AppError::indeterminate("insert").http_status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_error_body_shape() {
        let err = AppError::new(ErrorCode::IllegalTransition)
            .with_detail("from", "new")
            .with_detail("to", "completed");
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["code"], 4010);
        assert_eq!(json["details"]["to"], "completed");

        let body: ErrorBody =
            serde_json::from_str(r#"{"code":4102,"message":"Please add at least one item"}"#)
                .unwrap();
        assert_eq!(body.code, 4102);
        assert!(body.details.is_none());
    }
}
