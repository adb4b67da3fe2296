//! Stamp Ledger Models

use serde::{Deserialize, Serialize};

/// Stamps consumed by one coupon redemption
pub const COUPON_STAMPS: i64 = 10;

/// Upper bound for a single add/remove entered at the counter
pub const MAX_STAMPS_PER_ACTION: i64 = 100;

/// How the purchase that earned the stamps was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Card,
    Transfer,
    Cash,
    CashReceipt,
    TransferCashReceipt,
}

impl PaymentType {
    /// Display name used on the shop ledger sheet
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Card => "카드",
            Self::Transfer => "계좌이체",
            Self::Cash => "현금",
            Self::CashReceipt => "현금영수증",
            Self::TransferCashReceipt => "계좌이체(현금영수증)",
        }
    }
}

/// One ledger row per customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StampLedgerEntry {
    pub customer_id: i64,
    pub count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Add stamps payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampAdd {
    pub amount: i64,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
}

/// Remove stamps payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampRemove {
    pub amount: i64,
    #[serde(default)]
    pub note: String,
}

/// Redeem coupon payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StampRedeem {
    #[serde(default)]
    pub note: String,
}

/// Result of any ledger operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampCount {
    pub customer_id: i64,
    pub count: i64,
}
