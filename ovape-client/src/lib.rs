//! OVAPE Client - HTTP client for the stamp server
//!
//! - [`OvapeClient`] - typed calls for every counter-side operation
//! - [`Pager`] - "load more" offset tracking
//! - [`SubmitGuard`] - one in-flight submission per form

pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod pager;

pub use client::{LogScope, OvapeClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use guard::{SubmitGuard, SubmitToken};
pub use http::HttpClient;
pub use pager::Pager;

// Re-export shared types for convenience
pub use shared::{AppError, ErrorCode, Page, PageRequest};
