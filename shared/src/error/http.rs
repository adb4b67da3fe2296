//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::CustomerNotFound
            | Self::StampLedgerNotFound
            | Self::TicketNotFound
            | Self::LogNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::DuplicatePhone => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 422 Unprocessable (business rule rejections)
            Self::InsufficientStamps | Self::IllegalStatusTransition => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError | Self::StoreUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::AuditAppendFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
