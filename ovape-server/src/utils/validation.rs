//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Lengths are counted in characters since most input is Korean.

use crate::utils::AppError;
use shared::models::MAX_STAMPS_PER_ACTION;
use shared::util::phone_digits;

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MAX_NAME_LEN: usize = 50;

/// Notes, symptoms, remarks
pub const MAX_NOTE_LEN: usize = 500;

/// After-service item names
pub const MAX_ITEM_NAME_LEN: usize = 100;

/// After-service quantity bounds
pub const MIN_QUANTITY: i64 = 1;
pub const MAX_QUANTITY: i64 = 1000;

/// Accepted phone lengths after stripping separators
pub const PHONE_DIGITS_RANGE: std::ops::RangeInclusive<usize> = 10..=11;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that a possibly empty string is within the length limit.
pub fn validate_max_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_max_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Normalize a phone number to digits and check its length.
///
/// `010-1234 5678` becomes `01012345678`. Only digits, `-` and
/// whitespace are accepted.
pub fn normalize_phone(value: &str) -> Result<String, AppError> {
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_digit() || *c == '-' || c.is_whitespace()))
    {
        return Err(
            AppError::validation(format!("phone contains invalid character '{bad}'"))
                .with_detail("field", "phone"),
        );
    }
    let digits = phone_digits(value);
    if !PHONE_DIGITS_RANGE.contains(&digits.len()) {
        return Err(AppError::validation(format!(
            "phone must have 10 or 11 digits (got {})",
            digits.len()
        ))
        .with_detail("field", "phone"));
    }
    Ok(digits)
}

/// Validate a stamp amount entered at the counter.
pub fn validate_stamp_amount(amount: i64) -> Result<(), AppError> {
    if !(1..=MAX_STAMPS_PER_ACTION).contains(&amount) {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidStampAmount,
            format!("amount must be between 1 and {MAX_STAMPS_PER_ACTION} (got {amount})"),
        ));
    }
    Ok(())
}

/// Validate an after-service item quantity.
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::validation(format!(
            "quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY} (got {quantity})"
        )));
    }
    Ok(())
}
