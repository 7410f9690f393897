//! Unified error codes for the POS order service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors (41xx order validation, 42xx cart sessions)
//! - 6xxx: Menu errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as the bare u16 so clients can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Request body failed field validation
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Value out of range (line quantity cap)
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Requested status change is not the next step of the workflow
    IllegalTransition = 4010,
    /// Order was modified concurrently (stale version)
    VersionConflict = 4011,
    /// Customer name is missing
    MissingCustomerName = 4101,
    /// Cart has no items
    EmptyCart = 4102,
    /// Dine-in order without a table number
    MissingTableNumber = 4103,
    /// Cart session not found
    CartNotFound = 4201,
    /// Another checkout of the same cart is still running
    CheckoutInProgress = 4202,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is currently unavailable
    ItemUnavailable = 6003,
    /// Menu category not found
    CategoryNotFound = 6101,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout, outcome unknown
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::IllegalTransition => "Illegal order status transition",
            ErrorCode::VersionConflict => "Order was modified by another session",
            ErrorCode::MissingCustomerName => "Please enter customer name",
            ErrorCode::EmptyCart => "Please add at least one item",
            ErrorCode::MissingTableNumber => "Please enter table number for dine-in orders",
            ErrorCode::CartNotFound => "Cart not found",
            ErrorCode::CheckoutInProgress => "Cart is already being checked out",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::ItemUnavailable => "Menu item is currently unavailable",
            ErrorCode::CategoryNotFound => "Menu category not found",

            // System
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out, outcome unknown",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            8 => Ok(ErrorCode::ValueOutOfRange),

            4001 => Ok(ErrorCode::OrderNotFound),
            4010 => Ok(ErrorCode::IllegalTransition),
            4011 => Ok(ErrorCode::VersionConflict),
            4101 => Ok(ErrorCode::MissingCustomerName),
            4102 => Ok(ErrorCode::EmptyCart),
            4103 => Ok(ErrorCode::MissingTableNumber),
            4201 => Ok(ErrorCode::CartNotFound),
            4202 => Ok(ErrorCode::CheckoutInProgress),

            6001 => Ok(ErrorCode::MenuItemNotFound),
            6003 => Ok(ErrorCode::ItemUnavailable),
            6101 => Ok(ErrorCode::CategoryNotFound),

            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
