//! OVAPE Stamp Server - loyalty stamps, customers and after-service tickets
//!
//! # Overview
//!
//! - **Stamp ledger** (`services::ledger`): per-customer stamp counts with
//!   atomic add/remove/redeem
//! - **Audit log** (`audit`): append-only history of every change
//! - **Tickets** (`services::tickets`): after-service intake and status
//! - **Directory** (`services::directory`): customer CRUD and search
//! - **HTTP API** (`api`): JSON routes over the services
//!
//! Every mutation and its audit record commit in one SQLite transaction.
//!
//! # Layout
//!
//! ```text
//! ovape-server/src/
//! ├── core/          # config, state, errors, server
//! ├── auth/          # JWT validation, current user
//! ├── services/      # ledger, directory, tickets
//! ├── audit/         # audit log store, diffs, export
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # logging, validation
//! └── db/            # sqlx pool and repositories
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-exports
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env`, read and validate the configuration, start logging
pub fn setup_environment() -> core::Result<Config> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    config.validate().map_err(core::ServerError::Config)?;

    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
    if config.jwt.generated {
        tracing::warn!("JWT_SECRET not set, using a temporary secret; tokens will not survive a restart");
    }
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ____  _    _____    ____  ______
  / __ \| |  / /   |  / __ \/ ____/
 / / / /| | / / /| | / /_/ / __/
/ /_/ / | |/ / ___ |/ ____/ /___
\____/  |___/_/  |_/_/   /_____/
          stamp server
    "#
    );
}
