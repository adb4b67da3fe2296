//! Data models
//!
//! Shared between ovape-server and ovape-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Timestamps are UTC epoch milliseconds.

pub mod actor;
pub mod after_service;
pub mod audit_log;
pub mod customer;
pub mod stamp;

// Re-exports
pub use actor::*;
pub use after_service::*;
pub use audit_log::*;
pub use customer::*;
pub use stamp::*;
