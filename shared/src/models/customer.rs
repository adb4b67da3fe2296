//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Customer entity (고객)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Digits only, unique across customers
    pub phone: String,
    pub gender: Gender,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Customer with current stamp count (list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerWithStamps {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub customer: Customer,
    /// 0 when the customer has no ledger row yet
    pub stamp_count: i64,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub phone: String,
    pub gender: Gender,
    #[serde(default)]
    pub note: Option<String>,
}

/// Update customer payload
///
/// Absent fields are left unchanged. An empty `note` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.gender.is_none() && self.note.is_none()
    }
}

/// Which column a customer search keyword is matched against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSearchTarget {
    /// Name or phone
    #[default]
    All,
    Name,
    Phone,
}

/// Customer search query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerSearch {
    #[serde(default)]
    pub target: CustomerSearchTarget,
    #[serde(default)]
    pub keyword: String,
}
