//! Shared types, errors, and configuration for Tableau.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe document references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
