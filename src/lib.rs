//! Loyalty Points - Employee Achievement Tracking
//!
//! A Rust library for recording the points employees earn for their
//! achievements, looking them up by name and exporting the results.
//!
//! # Features
//!
//! - SQLite-backed achievement store with pooled connections
//! - Department inference from an employee's previous entries
//! - Point totals over search results
//! - Export to JSON and CSV

/// Configuration management
pub mod config;
/// Database operations and connection pooling
pub mod db;
/// Error types
pub mod error;
/// Achievement export
pub mod export;
/// Add, view and remove form handlers
pub mod handlers;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Store abstraction for achievement rows
pub mod repository;
/// Database schema definitions
pub mod schema;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use config::AppConfig;
pub use db::Database;
pub use error::{LoyaltyError, Result};
pub use handlers::FormHandlers;
pub use models::{Achievement, ExportFormat, NewAchievement};
pub use repository::{AchievementStore, SqliteAchievementStore};
