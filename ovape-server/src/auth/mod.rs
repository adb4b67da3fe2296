//! Authentication
//!
//! - [`JwtService`] - token validation
//! - [`CurrentUser`] - acting staff member
//! - [`require_auth`] - authentication middleware
//! - [`require_admin`] - admin-only routes

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
