//! Shared types, errors, and configuration for Invoicer.
//!
//! This crate provides common types used across all other crates:
//! - `Money` with exact decimal precision
//! - Typed IDs for persisted records
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, ImportConfig, ServerConfig};
pub use error::{AppError, AppResult};
