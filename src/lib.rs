//! gdev-kit
//!
//! Two independent utilities:
//! - Recursive directory copy preserving file type, ownership and permissions
//!   ([`infrastructure::fs`])
//! - JWT issuing/validation with authentication and role authorization
//!   middleware for axum ([`infrastructure::auth`], [`api::middleware`])

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{DomainError, TokenInfo};
