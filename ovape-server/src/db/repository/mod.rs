//! Repository Module
//!
//! Free async functions over SQLite. Every function takes a generic
//! executor so the services can run several of them inside one transaction.

pub mod after_service;
pub mod audit_log;
pub mod customer;
pub mod stamp;
pub mod user;

use shared::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Busy/locked database or exhausted pool; safe to retry
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

// SQLite primary result codes (extended codes share the low byte)
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepoError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) => {
                let primary = db
                    .code()
                    .and_then(|c| c.parse::<i32>().ok())
                    .map(|c| c & 0xff);
                match primary {
                    Some(SQLITE_BUSY) | Some(SQLITE_LOCKED) => {
                        RepoError::Unavailable(db.message().to_string())
                    }
                    _ => RepoError::Database(db.message().to_string()),
                }
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => {
                AppError::with_message(shared::ErrorCode::AlreadyExists, msg)
            }
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Unavailable(msg) => AppError::store_unavailable(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// `%keyword%` with LIKE wildcards escaped (used with `ESCAPE '\'`)
pub(crate) fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
