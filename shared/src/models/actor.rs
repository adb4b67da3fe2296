//! Actor Model
//!
//! Staff identity as supplied by the auth provider. Mirrored into the
//! `users` table so history listings can show who did what.

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Role {
    #[default]
    Staff,
    Admin,
}

/// Actor entity (직원)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
