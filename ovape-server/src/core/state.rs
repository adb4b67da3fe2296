use std::sync::Arc;

use sqlx::SqlitePool;

use crate::audit::AuditLogStore;
use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services::{CustomerDirectory, StampLedger, TicketStore};

/// Server state - shared handles to every service
///
/// Cloned per request; every field is a pool handle or an `Arc`.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | pool | SQLite pool |
/// | jwt_service | token validation |
/// | ledger | stamp ledger |
/// | directory | customer directory |
/// | tickets | after-service tickets |
/// | audit | audit log store |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub ledger: StampLedger,
    pub directory: CustomerDirectory,
    pub tickets: TicketStore,
    pub audit: AuditLogStore,
}

impl ServerState {
    /// Assemble state around an open database
    pub fn new(config: Config, db: DbService) -> Self {
        let pool = db.pool;
        Self {
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            ledger: StampLedger::new(pool.clone()),
            directory: CustomerDirectory::new(pool.clone()),
            tickets: TicketStore::new(pool.clone(), config.transition_policy),
            audit: AuditLogStore::new(pool.clone()),
            pool,
            config,
        }
    }

    /// Create the work directory, open the database and build the state
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        if let Some(parent) = std::path::Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = DbService::new(&config.database_path, config.db_max_connections).await?;
        tracing::info!(
            policy = ?config.transition_policy,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), db))
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
