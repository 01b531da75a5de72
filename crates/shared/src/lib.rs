//! Shared types, errors, and configuration for Tradeledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money rounding helpers with decimal precision
//! - Application-wide error types
//! - Configuration management
//! - Sale notification delivery

pub mod config;
pub mod error;
pub mod notification;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
