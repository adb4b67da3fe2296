use thiserror::Error;

use crate::utils::AppError;

/// Startup and serve-loop errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] AppError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result alias for server lifecycle functions
pub type Result<T> = std::result::Result<T, ServerError>;
