//! Utility module
//!
//! - [`AppError`] / [`AppResult`] (from `shared::error`)
//! - Logger setup
//! - Input validation helpers

pub mod logger;
pub mod result;
pub mod validation;

pub use result::AppResult;
pub use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};
