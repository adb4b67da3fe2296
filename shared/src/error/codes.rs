//! Unified error codes for the OVAPE stamp system
//!
//! This module defines all error codes used across ovape-server, ovape-client and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Customer errors
//! - 4xxx: Stamp ledger errors
//! - 5xxx: After-service errors
//! - 6xxx: Audit log errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 3001,
    /// Phone number already registered to another customer
    DuplicatePhone = 3002,

    // ==================== 4xxx: Stamp ledger ====================
    /// Customer has no stamp ledger yet
    StampLedgerNotFound = 4001,
    /// Requested amount exceeds the current stamp count
    InsufficientStamps = 4002,
    /// Stamp amount must be a positive integer
    InvalidStampAmount = 4003,

    // ==================== 5xxx: After-service ====================
    /// After-service ticket not found
    TicketNotFound = 5001,
    /// Status transition not allowed by the configured policy
    IllegalStatusTransition = 5002,

    // ==================== 6xxx: Audit log ====================
    /// Log record not found
    LogNotFound = 6001,
    /// Payload patch does not match the record's category
    LogPayloadMismatch = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Store temporarily unavailable (busy, pool exhausted, IO)
    StoreUnavailable = 9006,
    /// Mutation rolled back because its audit record could not be written
    AuditAppendFailed = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Whether the caller may retry the same request unchanged
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::StoreUnavailable | ErrorCode::NetworkError | ErrorCode::TimeoutError
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::DuplicatePhone => "Phone number is already registered",

            // Stamp ledger
            ErrorCode::StampLedgerNotFound => "Customer has no stamps",
            ErrorCode::InsufficientStamps => "Not enough stamps",
            ErrorCode::InvalidStampAmount => "Stamp amount must be positive",

            // After-service
            ErrorCode::TicketNotFound => "After-service ticket not found",
            ErrorCode::IllegalStatusTransition => "Status transition is not allowed",

            // Audit log
            ErrorCode::LogNotFound => "Log record not found",
            ErrorCode::LogPayloadMismatch => "Payload patch does not match log category",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StoreUnavailable => "Store temporarily unavailable, please retry",
            ErrorCode::AuditAppendFailed => "Audit record could not be written; change was rolled back",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
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
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),

            // Customer
            3001 => Ok(ErrorCode::CustomerNotFound),
            3002 => Ok(ErrorCode::DuplicatePhone),

            // Stamp ledger
            4001 => Ok(ErrorCode::StampLedgerNotFound),
            4002 => Ok(ErrorCode::InsufficientStamps),
            4003 => Ok(ErrorCode::InvalidStampAmount),

            // After-service
            5001 => Ok(ErrorCode::TicketNotFound),
            5002 => Ok(ErrorCode::IllegalStatusTransition),

            // Audit log
            6001 => Ok(ErrorCode::LogNotFound),
            6002 => Ok(ErrorCode::LogPayloadMismatch),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::StoreUnavailable),
            9101 => Ok(ErrorCode::AuditAppendFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::CustomerNotFound.code(), 3001);
        assert_eq!(ErrorCode::DuplicatePhone.code(), 3002);
        assert_eq!(ErrorCode::StampLedgerNotFound.code(), 4001);
        assert_eq!(ErrorCode::InsufficientStamps.code(), 4002);
        assert_eq!(ErrorCode::TicketNotFound.code(), 5001);
        assert_eq!(ErrorCode::LogNotFound.code(), 6001);
        assert_eq!(ErrorCode::StoreUnavailable.code(), 9006);
        assert_eq!(ErrorCode::AuditAppendFailed.code(), 9101);
    }

    #[test]
    fn test_try_from_round_trips_every_variant() {
        let all = [
            ErrorCode::Success,
            ErrorCode::Unknown,
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidRequest,
            ErrorCode::InvalidFormat,
            ErrorCode::RequiredField,
            ErrorCode::ValueOutOfRange,
            ErrorCode::NotAuthenticated,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::PermissionDenied,
            ErrorCode::AdminRequired,
            ErrorCode::CustomerNotFound,
            ErrorCode::DuplicatePhone,
            ErrorCode::StampLedgerNotFound,
            ErrorCode::InsufficientStamps,
            ErrorCode::InvalidStampAmount,
            ErrorCode::TicketNotFound,
            ErrorCode::IllegalStatusTransition,
            ErrorCode::LogNotFound,
            ErrorCode::LogPayloadMismatch,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::NetworkError,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
            ErrorCode::StoreUnavailable,
            ErrorCode::AuditAppendFailed,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorCode::StoreUnavailable.is_retryable());
        assert!(ErrorCode::TimeoutError.is_retryable());
        assert!(!ErrorCode::DuplicatePhone.is_retryable());
        assert!(!ErrorCode::InsufficientStamps.is_retryable());
        assert!(!ErrorCode::AuditAppendFailed.is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::InsufficientStamps.to_string(), "E4002");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::DuplicatePhone).unwrap();
        assert_eq!(json, "3002");

        let json = serde_json::to_string(&ErrorCode::Success).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::InsufficientStamps);

        assert!(serde_json::from_str::<ErrorCode>("4999").is_err());
    }
}
