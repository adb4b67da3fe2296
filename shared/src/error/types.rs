//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type of the stamp system, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Whether the same request may be retried unchanged
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create a transient store error (eligible for retry)
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StoreUnavailable, msg)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create an unauthorized error (alias for not_authenticated)
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    // ==================== Domain constructors ====================

    /// Customer with this id does not exist
    pub fn customer_not_found(id: i64) -> Self {
        Self::new(ErrorCode::CustomerNotFound).with_detail("customer_id", id)
    }

    /// Phone number collides with another customer
    pub fn duplicate_phone(phone: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicatePhone).with_detail("phone", phone.into())
    }

    /// Customer has no ledger row yet
    pub fn ledger_not_found(customer_id: i64) -> Self {
        Self::new(ErrorCode::StampLedgerNotFound).with_detail("customer_id", customer_id)
    }

    /// Requested amount exceeds the current count
    pub fn insufficient_stamps(requested: i64, available: i64) -> Self {
        Self::with_message(
            ErrorCode::InsufficientStamps,
            format!("Not enough stamps: requested {requested}, available {available}"),
        )
        .with_detail("requested", requested)
        .with_detail("available", available)
    }

    /// Ticket with this id does not exist
    pub fn ticket_not_found(id: i64) -> Self {
        Self::new(ErrorCode::TicketNotFound).with_detail("ticket_id", id)
    }

    /// Log record with this id does not exist
    pub fn log_not_found(id: i64) -> Self {
        Self::new(ErrorCode::LogNotFound).with_detail("log_id", id)
    }

    /// The mutation was rolled back because its audit record failed to persist
    pub fn audit_append_failed(action: impl Into<String>, cause: impl Into<String>) -> Self {
        let action = action.into();
        Self::with_message(
            ErrorCode::AuditAppendFailed,
            format!("Audit record for '{action}' could not be written; change was rolled back"),
        )
        .with_detail("action", action)
        .with_detail("cause", cause.into())
    }
}

/// Unified API response structure
///
/// Provides a consistent response format for all API endpoints:
/// - `code`: Error code (0 for success)
/// - `message`: Human-readable message
/// - `data`: Response payload (on success)
/// - `details`: Additional error details (on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success, non-zero for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: None,
            details: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

impl<T> ApiResponse<T> {
    /// Rebuild the AppError carried by an error response
    pub fn into_error(self) -> Option<AppError> {
        let code = ErrorCode::try_from(self.code?).ok()?;
        if code.is_success() {
            return None;
        }
        Some(AppError {
            code,
            message: self.message,
            details: self.details,
        })
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}
