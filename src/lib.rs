//! Rusty Gate - a credential authentication and session issuance service
//!
//! This library verifies user credentials, creates accounts, and issues
//! short-lived access tokens plus longer-lived refresh tokens, delivered
//! per the calling client's trust model (browser cookies vs. response body).

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
