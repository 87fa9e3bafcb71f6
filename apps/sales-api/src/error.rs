//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Sales API                          │
//! │                                                                         │
//! │  Handler → SaleService → Result<T, ApiError>                           │
//! │                │                                                        │
//! │                ├── CoreError::Validation   → 400 VALIDATION_ERROR       │
//! │                ├── CoreError::SaleNotFound → 404 NOT_FOUND              │
//! │                ├── CoreError::SaleCanceled → 400 SALE_CANCELED          │
//! │                ├── CoreError::AlreadyCanceled → 400 ALREADY_CANCELED    │
//! │                ├── DbError::VersionConflict → 409 VERSION_CONFLICT      │
//! │                └── DbError::* (other)      → 500 DATABASE_ERROR         │
//! │                                                                         │
//! │  IntoResponse → status + JSON body                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Body
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "Validation failed",
//!   "errors": [{ "field": "items[0].quantity", "message": "items[0].quantity must be between 1 and 20" }]
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use ts_rs::TS;

use salesdesk_core::{CoreError, ValidationError, ValidationErrors};
use salesdesk_db::DbError;

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Field-level validation failed (400)
    ValidationError,

    /// Body or query could not be parsed (400)
    MalformedRequest,

    /// Unknown sale or product (404)
    NotFound,

    /// Mutation of a canceled sale (400)
    SaleCanceled,

    /// Second cancel of one sale (400)
    AlreadyCanceled,

    /// Stale version token (409)
    VersionConflict,

    /// Unique key collision (409)
    Duplicate,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError
            | ErrorCode::MalformedRequest
            | ErrorCode::SaleCanceled
            | ErrorCode::AlreadyCanceled => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::VersionConflict | ErrorCode::Duplicate => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// One failed field of a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// API error returned from handlers, serialized as the response body.
#[derive(Debug, Clone, Serialize, TS, thiserror::Error)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field details; empty unless `code` is `VALIDATION_ERROR`
    pub errors: Vec<FieldError>,
}

impl ApiError {
    /// Creates a new API error without field details.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error from every collected failure.
    pub fn validation(errors: ValidationErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: "Validation failed".to_string(),
            errors: errors.into_iter().map(FieldError::from).collect(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::MalformedRequest, message)
    }

    pub fn version_conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::VersionConflict, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SaleNotFound(_) | CoreError::ItemNotFound { .. } => {
                ApiError::not_found(err.to_string())
            }
            CoreError::SaleCanceled { .. } => ApiError::new(ErrorCode::SaleCanceled, err.to_string()),
            CoreError::AlreadyCanceled { .. } => {
                ApiError::new(ErrorCode::AlreadyCanceled, err.to_string())
            }
            CoreError::Validation(errors) => ApiError::validation(errors),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation(errors)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.into())
    }
}

/// Converts database errors to API errors.
///
/// Anything the client cannot act on becomes a generic 500; the detail is
/// logged here and never leaves the process.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::not_found(format!("{} not found: {}", entity, id))
            }
            DbError::VersionConflict { .. } => ApiError::version_conflict(err.to_string()),
            DbError::UniqueViolation { ref field, .. } => {
                tracing::warn!(field = %field, "Unique constraint violated");
                ApiError::new(ErrorCode::Duplicate, err.to_string())
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::SaleNotFound("SALE-1".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::AlreadyCanceled {
            number: "SALE-1".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::AlreadyCanceled);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = CoreError::SaleCanceled {
            number: "SALE-1".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_body() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required {
            field: "customerName".to_string(),
        });
        let err: ApiError = CoreError::Validation(errors).into();

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"][0]["field"], "customerName");
        assert_eq!(json["errors"][0]["message"], "customerName is required");
    }

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::version_conflict("SALE-1", 2).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Database operation failed");
        assert!(err.errors.is_empty());
    }
}
