//! Audit log module
//!
//! ```text
//! mutation (ledger / tickets / directory)
//!   └─ same transaction ─ AuditLogStore::append() → logs table
//! ```
//!
//! - **Append-only**: the schema rejects deletes and identity-field updates
//! - **Typed payload**: [`shared::models::LogPayload`] variant always matches the category
//! - **Diffs**: [`diff`] builds the per-field customer change set
//! - **Export**: [`export`] renders a stamp log as a ledger-sheet line

pub mod diff;
pub mod export;
pub mod store;

pub use diff::{customer_created, customer_deleted, customer_diff};
pub use export::export_line;
pub use store::{AuditLogStore, LogEntry};
