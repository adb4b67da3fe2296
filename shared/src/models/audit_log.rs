//! Audit Log Models
//!
//! Every mutation of the ledger, ticket store and customer directory appends
//! one [`AuditLogRecord`]. The payload is a tagged union whose variant always
//! matches the record's [`LogCategory`].

use super::after_service::AfterServiceStatus;
use super::customer::Gender;
use super::stamp::PaymentType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Log category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum LogCategory {
    Customer,
    Stamp,
    AfterService,
    Remark,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Stamp => "stamp",
            Self::AfterService => "after_service",
            Self::Remark => "remark",
        }
    }
}

/// Action code error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log action: {0}")]
pub struct ParseActionError(pub String);

/// What a log record did, rendered as its string code (`add-5`, `coupon-10`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LogAction {
    AddStamps(i64),
    RemoveStamps(i64),
    RedeemCoupon(i64),
    CreateCustomer,
    UpdateCustomerInfo,
    DeleteCustomer,
    AfterService(AfterServiceStatus),
    Remark,
}

impl LogAction {
    /// Category this action is filed under
    pub fn category(&self) -> LogCategory {
        match self {
            Self::AddStamps(_) | Self::RemoveStamps(_) | Self::RedeemCoupon(_) => {
                LogCategory::Stamp
            }
            Self::CreateCustomer | Self::UpdateCustomerInfo | Self::DeleteCustomer => {
                LogCategory::Customer
            }
            Self::AfterService(_) => LogCategory::AfterService,
            Self::Remark => LogCategory::Remark,
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddStamps(n) => write!(f, "add-{n}"),
            Self::RemoveStamps(n) => write!(f, "remove-{n}"),
            Self::RedeemCoupon(n) => write!(f, "coupon-{n}"),
            Self::CreateCustomer => f.write_str("create-customer"),
            Self::UpdateCustomerInfo => f.write_str("update-customer-info"),
            Self::DeleteCustomer => f.write_str("delete-customer"),
            Self::AfterService(status) => write!(f, "after-service-{status}"),
            Self::Remark => f.write_str("remark"),
        }
    }
}

impl FromStr for LogAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseActionError(s.to_string());
        let amount = |n: &str| {
            n.parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ParseActionError(s.to_string()))
        };

        match s {
            "create-customer" => return Ok(Self::CreateCustomer),
            "update-customer-info" => return Ok(Self::UpdateCustomerInfo),
            "delete-customer" => return Ok(Self::DeleteCustomer),
            "remark" => return Ok(Self::Remark),
            // legacy spelling found in older rows
            "after-service-recieved" => return Ok(Self::AfterService(AfterServiceStatus::Received)),
            _ => {}
        }

        if let Some(n) = s.strip_prefix("add-") {
            return amount(n).map(Self::AddStamps);
        }
        if let Some(n) = s.strip_prefix("remove-") {
            return amount(n).map(Self::RemoveStamps);
        }
        if let Some(n) = s.strip_prefix("coupon-") {
            return amount(n).map(Self::RedeemCoupon);
        }
        if let Some(status) = s.strip_prefix("after-service-") {
            return status.parse().map(Self::AfterService).map_err(|_| err());
        }
        Err(err())
    }
}

impl From<LogAction> for String {
    fn from(action: LogAction) -> Self {
        action.to_string()
    }
}

impl TryFrom<String> for LogAction {
    type Error = ParseActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One changed field: `{ "old": .., "new": .. }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange<T> {
    pub old: Option<T>,
    pub new: Option<T>,
}

/// Field-level diff of a customer, in the order name, phone, gender, note.
/// Unchanged fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FieldChange<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<FieldChange<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<FieldChange<Gender>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<FieldChange<String>>,
}

impl CustomerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.gender.is_none() && self.note.is_none()
    }

    /// Changed field names in diff order
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.phone.is_some() {
            fields.push("phone");
        }
        if self.gender.is_some() {
            fields.push("gender");
        }
        if self.note.is_some() {
            fields.push("note");
        }
        fields
    }
}

/// Stamp log metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    /// Ledger count right after the operation
    pub balance: i64,
}

/// After-service log metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfterServiceDetails {
    pub status: AfterServiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<AfterServiceStatus>,
}

/// Remark log metadata (the text itself is the record note)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemarkDetails {}

/// Category-keyed payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum LogPayload {
    Customer(CustomerChanges),
    Stamp(StampDetails),
    AfterService(AfterServiceDetails),
    Remark(RemarkDetails),
}

impl LogPayload {
    pub fn category(&self) -> LogCategory {
        match self {
            Self::Customer(_) => LogCategory::Customer,
            Self::Stamp(_) => LogCategory::Stamp,
            Self::AfterService(_) => LogCategory::AfterService,
            Self::Remark(_) => LogCategory::Remark,
        }
    }

    pub fn payment_type(&self) -> Option<PaymentType> {
        match self {
            Self::Stamp(details) => details.payment_type,
            _ => None,
        }
    }
}

/// Persisted audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AuditLogRecord {
    pub id: i64,
    /// Actor who performed the action
    pub admin_id: String,
    pub customer_id: Option<i64>,
    pub after_service_id: Option<i64>,
    pub category: LogCategory,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub action: LogAction,
    pub note: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub payload: LogPayload,
    pub created_at: i64,
}

/// Record joined with actor and customer display info
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LogListItem {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub record: AuditLogRecord,
    pub actor_name: Option<String>,
    pub actor_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

/// Fields of a payload that may be corrected after the fact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPayloadPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
}

impl LogPayloadPatch {
    pub fn is_empty(&self) -> bool {
        self.payment_type.is_none()
    }
}

/// Update note payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogNoteUpdate {
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_patch: Option<LogPayloadPatch>,
}

/// Staff remark payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemarkCreate {
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub after_service_id: Option<i64>,
    pub note: String,
}

/// Filters for the all-subjects listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<LogCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
}

/// Clipboard export of a stamp log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogExport {
    pub log_id: i64,
    pub line: String,
}
