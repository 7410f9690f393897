//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::CartNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::IllegalTransition
            | Self::VersionConflict
            | Self::CheckoutInProgress => StatusCode::CONFLICT,

            // 422 Unprocessable (well-formed request the catalog can't honour)
            Self::ItemUnavailable => StatusCode::UNPROCESSABLE_ENTITY,

            // 504 Gateway Timeout (write outcome unknown, do not blindly retry)
            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,

            // 500 Internal Server Error
            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
