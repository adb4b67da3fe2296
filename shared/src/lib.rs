//! Shared types for the OVAPE stamp system
//!
//! Common types used by the server and client crates: the error system,
//! domain models, pagination and small utilities.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use pagination::{Page, PageRequest};
pub use serde::{Deserialize, Serialize};
