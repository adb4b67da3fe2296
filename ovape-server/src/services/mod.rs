//! Domain services
//!
//! - [`StampLedger`] - per-customer stamp counter
//! - [`CustomerDirectory`] - customers with phone uniqueness and field diffs
//! - [`TicketStore`] - after-service tickets and status transitions
//!
//! Every mutation runs in one transaction opened by [`begin_audited`] and
//! appends its audit record through [`crate::audit::AuditLogStore::append`]
//! before committing.

pub mod directory;
pub mod ledger;
pub mod tickets;

pub use directory::CustomerDirectory;
pub use ledger::StampLedger;
pub use tickets::{TicketStore, TransitionPolicy};

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::repository::{RepoError, user};
use crate::utils::AppResult;
use shared::models::Actor;
use shared::util::now_millis;

/// Open a transaction and record the acting staff member in it
pub(crate) async fn begin_audited(
    pool: &SqlitePool,
    actor: &Actor,
) -> AppResult<Transaction<'static, Sqlite>> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    user::upsert(&mut *tx, actor, now_millis()).await?;
    Ok(tx)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::CustomerDirectory;
    use crate::db::DbService;
    use shared::models::{Actor, CustomerCreate, Gender, Role};
    use sqlx::SqlitePool;

    pub async fn pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    /// File database with several connections, for tests that need real
    /// concurrent writers
    pub async fn file_pool(dir: &tempfile::TempDir, max_connections: u32) -> SqlitePool {
        let path = dir.path().join("ovape.db");
        DbService::new(path.to_str().unwrap(), max_connections)
            .await
            .unwrap()
            .pool
    }

    pub fn staff() -> Actor {
        Actor {
            id: "staff-1".to_string(),
            name: "박직원".to_string(),
            email: "staff@ovape.kr".to_string(),
            role: Role::Staff,
        }
    }

    pub fn admin() -> Actor {
        Actor {
            id: "admin-1".to_string(),
            name: "관리자".to_string(),
            email: "admin@ovape.kr".to_string(),
            role: Role::Admin,
        }
    }

    pub async fn create_customer(pool: &SqlitePool, name: &str, phone: &str) -> i64 {
        let input = CustomerCreate {
            name: name.to_string(),
            phone: phone.to_string(),
            gender: Gender::Male,
            note: None,
        };
        CustomerDirectory::new(pool.clone())
            .create(&staff(), input)
            .await
            .unwrap()
            .id
    }

    pub async fn log_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    /// Make every audit insert fail from now on
    pub async fn break_audit_log(pool: &SqlitePool) {
        sqlx::query(
            "CREATE TRIGGER logs_reject_insert BEFORE INSERT ON logs BEGIN SELECT RAISE(ABORT, 'audit storage offline'); END",
        )
        .execute(pool)
        .await
        .unwrap();
    }
}
