//! After-Service (AS) Ticket Models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of item brought in for service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AfterServiceItemType {
    Device,
    DisposableDevice,
    Liquid,
    Consumable,
}

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum AfterServiceStatus {
    Received,
    Exchange,
    Rental,
    SentForRepair,
    RepairReturned,
    RepairRejected,
    CustomerReceived,
    Returned,
    Other,
}

impl AfterServiceStatus {
    pub const ALL: [AfterServiceStatus; 9] = [
        Self::Received,
        Self::Exchange,
        Self::Rental,
        Self::SentForRepair,
        Self::RepairReturned,
        Self::RepairRejected,
        Self::CustomerReceived,
        Self::Returned,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Exchange => "exchange",
            Self::Rental => "rental",
            Self::SentForRepair => "sent_for_repair",
            Self::RepairReturned => "repair_returned",
            Self::RepairRejected => "repair_rejected",
            Self::CustomerReceived => "customer_received",
            Self::Returned => "returned",
            Self::Other => "other",
        }
    }

    /// Forward-only workflow graph used by the strict transition policy.
    ///
    /// `Other` is the manual escape hatch: reachable from everywhere and
    /// allowed to move anywhere.
    pub fn can_transition_to(&self, next: AfterServiceStatus) -> bool {
        use AfterServiceStatus::*;

        if *self == next {
            return false;
        }
        if next == Other {
            return true;
        }
        match self {
            Received => matches!(
                next,
                Exchange | Rental | SentForRepair | CustomerReceived | Returned
            ),
            SentForRepair => matches!(next, RepairReturned | RepairRejected),
            RepairReturned | RepairRejected | Exchange | Rental => {
                matches!(next, CustomerReceived | Returned)
            }
            CustomerReceived | Returned => false,
            Other => true,
        }
    }
}

impl fmt::Display for AfterServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AfterServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown after-service status: {s}"))
    }
}

/// After-service ticket entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AfterServiceTicket {
    pub id: i64,
    pub customer_id: i64,
    /// Staff member who opened the ticket
    pub admin_id: String,
    pub item_type: AfterServiceItemType,
    pub item_name: String,
    pub quantity: i64,
    pub symptom: String,
    pub note: Option<String>,
    pub status: AfterServiceStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Ticket joined with customer and staff display info
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AfterServiceListItem {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub ticket: AfterServiceTicket,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub admin_name: Option<String>,
}

/// Create ticket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AfterServiceCreate {
    pub customer_id: i64,
    pub item_type: AfterServiceItemType,
    pub item_name: String,
    pub quantity: i64,
    pub symptom: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransition {
    pub status: AfterServiceStatus,
    #[serde(default)]
    pub note: String,
}

/// Which column a ticket search keyword is matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterServiceSearchTarget {
    #[default]
    All,
    Name,
    Phone,
    ItemName,
}

/// Ticket list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AfterServiceFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AfterServiceStatus>,
    #[serde(default)]
    pub target: AfterServiceSearchTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_round_trip() {
        for status in AfterServiceStatus::ALL {
            assert_eq!(status.as_str().parse::<AfterServiceStatus>(), Ok(status));
        }
        assert!("recieved".parse::<AfterServiceStatus>().is_err());
    }

    #[test]
    fn test_status_serde_matches_as_str() {
        let json = serde_json::to_string(&AfterServiceStatus::SentForRepair).unwrap();
        assert_eq!(json, "\"sent_for_repair\"");
    }

    #[test]
    fn test_strict_graph() {
        use AfterServiceStatus::*;
        assert!(Received.can_transition_to(SentForRepair));
        assert!(SentForRepair.can_transition_to(RepairRejected));
        assert!(RepairReturned.can_transition_to(CustomerReceived));
        assert!(!Received.can_transition_to(RepairReturned));
        assert!(!CustomerReceived.can_transition_to(Received));
        assert!(CustomerReceived.can_transition_to(Other));
        assert!(Other.can_transition_to(Received));
        assert!(!Received.can_transition_to(Received));
    }
}
