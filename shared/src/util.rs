/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Strip everything but ASCII digits (`010-1234 5678` -> `01012345678`)
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a Korean phone number for display.
///
/// - 11 digits: `010-1234-5678`
/// - 10 digits starting with `02` (Seoul): `02-1234-5678`
/// - other 10 digits: `031-123-4567`
///
/// Anything else is returned unchanged.
pub fn format_phone_number(phone: &str) -> String {
    let digits = phone_digits(phone);
    match digits.len() {
        11 => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]),
        10 if digits.starts_with("02") => {
            format!("{}-{}-{}", &digits[..2], &digits[2..6], &digits[6..])
        }
        10 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => phone.to_string(),
    }
}
