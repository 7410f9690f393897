//! 统一错误处理
//!
//! 错误类型统一来自 `shared::error`，这里补充服务端专有的转换：
//! sqlx 错误、请求体校验错误 (validator)。

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};

use validator::ValidationErrors;

/// sqlx 错误 -> AppError
pub fn database_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::RowNotFound => AppError::not_found("Row"),
        other => AppError::database(other.to_string()),
    }
}

/// validator 错误 -> AppError (字段名放入 details)
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
    fields.sort_unstable();

    let mut err = AppError::validation(format!("Invalid fields: {}", fields.join(", ")));
    for (field, field_errors) in errors.field_errors() {
        let codes: Vec<String> = field_errors.iter().map(|e| e.code.to_string()).collect();
        err = err.with_detail(field.to_string(), codes.join(","));
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MenuItemCreate;
    use validator::Validate;

    #[test]
    fn test_validation_error_lists_fields() {
        let payload: MenuItemCreate = serde_json::from_str(
            r#"{"name":"","category":"Veg Starters","fullPrice":-1,"isVeg":true}"#,
        )
        .unwrap();
        let err = validation_error(payload.validate().unwrap_err());

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Invalid fields: full_price, name");
        let details = err.details.unwrap();
        assert!(details.contains_key("name"));
        assert!(details.contains_key("full_price"));
    }

    #[test]
    fn test_database_error_codes() {
        assert_eq!(database_error(sqlx::Error::RowNotFound).code, ErrorCode::NotFound);
        assert_eq!(
            database_error(sqlx::Error::PoolTimedOut).code,
            ErrorCode::DatabaseError
        );
    }
}
