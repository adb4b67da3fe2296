//! API routes
//!
//! - [`health`] - liveness
//! - [`customers`] - customer directory
//! - [`stamps`] - stamp ledger
//! - [`logs`] - audit log
//! - [`after_services`] - after-service tickets

pub mod after_services;
pub mod customers;
pub mod health;
pub mod logs;
pub mod stamps;

pub use crate::utils::AppResult;
