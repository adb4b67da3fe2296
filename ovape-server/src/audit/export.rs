//! Ledger-sheet export of stamp logs
//!
//! The shop pastes these tab-separated lines into its bookkeeping sheet:
//!
//! ```text
//! 오베이프 \t 2024. 03. 5 \t note \t \t \t 카드 \t 김민수 \t 010-1234-5678
//! ```

use chrono::{DateTime, FixedOffset};
use shared::models::AuditLogRecord;
use shared::util::format_phone_number;

const SHOP_NAME: &str = "오베이프";
const UNKNOWN_NAME: &str = "이름 없음";

/// KST, UTC+9
fn kst() -> Option<FixedOffset> {
    FixedOffset::east_opt(9 * 3600)
}

/// `YYYY. MM. D` in KST
fn format_date(created_at_ms: i64) -> String {
    let date = DateTime::from_timestamp_millis(created_at_ms)
        .zip(kst())
        .map(|(utc, offset)| utc.with_timezone(&offset));
    match date {
        Some(date) => date.format("%Y. %m. %-d").to_string(),
        None => String::new(),
    }
}

/// Render one record; missing customer info falls back to a placeholder name
pub fn export_line(
    record: &AuditLogRecord,
    customer_name: Option<&str>,
    customer_phone: Option<&str>,
) -> String {
    let payment = record
        .payload
        .payment_type()
        .map(|p| p.display_name())
        .unwrap_or("");
    let name = customer_name
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_NAME);
    let phone = customer_phone.map(format_phone_number).unwrap_or_default();

    format!(
        "{SHOP_NAME}\t{}\t{}\t\t\t{payment}\t{name}\t{phone}",
        format_date(record.created_at),
        record.note
    )
}
