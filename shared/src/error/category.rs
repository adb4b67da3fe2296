//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Customer errors
/// - 4xxx: Stamp ledger errors
/// - 5xxx: After-service errors
/// - 6xxx: Audit log errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Customer errors (3xxx)
    Customer,
    /// Stamp ledger errors (4xxx)
    Stamp,
    /// After-service errors (5xxx)
    AfterService,
    /// Audit log errors (6xxx)
    AuditLog,
    /// System errors (7xxx and above)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Customer,
            4000..5000 => Self::Stamp,
            5000..6000 => Self::AfterService,
            6000..7000 => Self::AuditLog,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Customer => "customer",
            Self::Stamp => "stamp",
            Self::AfterService => "after_service",
            Self::AuditLog => "audit_log",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Customer);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Stamp);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::AfterService);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::AuditLog);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::DuplicatePhone.category(), ErrorCategory::Customer);
        assert_eq!(ErrorCode::InsufficientStamps.category(), ErrorCategory::Stamp);
        assert_eq!(
            ErrorCode::IllegalStatusTransition.category(),
            ErrorCategory::AfterService
        );
        assert_eq!(ErrorCode::LogNotFound.category(), ErrorCategory::AuditLog);
        assert_eq!(ErrorCode::AuditAppendFailed.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::AfterService).unwrap();
        assert_eq!(json, "\"after_service\"");

        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
