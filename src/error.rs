//! Error types for the loyalty-points library.
//!
//! This module provides custom error types using `thiserror`. Validation
//! failures raised by the form handlers are "user facing": they carry a
//! message meant to be shown to whoever submitted the form. Everything else
//! is an infrastructure failure and propagates as-is.

use thiserror::Error;

/// Errors that can occur in the loyalty-points application.
#[derive(Error, Debug)]
pub enum LoyaltyError {
    /// Configuration file missing, unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration values that parsed but failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No explicit department and no earlier entry to inherit one from
    #[error("could not find a department for employee {employee}")]
    DepartmentNotFound {
        /// Employee named in the submission
        employee: String,
    },

    /// A required form field was blank
    #[error("{0}")]
    Validation(String),

    /// A point value that is not an integer
    #[error("{}", invalid_point_message(.value, .id))]
    InvalidPoint {
        /// Raw point text
        value: String,
        /// Row the value came from, when it was read from storage
        id: Option<i64>,
    },

    /// An achievement id that is not an integer
    #[error("achievement id must be an integer, got {value:?}")]
    InvalidId {
        /// Raw id text
        value: String,
    },

    /// Database-related errors
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// A blocking storage task panicked or was cancelled
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn invalid_point_message(value: &str, id: &Option<i64>) -> String {
    match id {
        Some(id) => format!("achievement {id} has a non-integer point value {value:?}"),
        None => format!("point must be an integer, got {value:?}"),
    }
}

impl LoyaltyError {
    /// True for failures caused by the submitted form rather than the system.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::DepartmentNotFound { .. }
                | Self::Validation(_)
                | Self::InvalidPoint { .. }
                | Self::InvalidId { .. }
        )
    }

    /// Message to show the person who submitted the form.
    ///
    /// Infrastructure failures collapse into a generic alert; their details
    /// belong in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_user_facing() {
            self.to_string()
        } else {
            "the request could not be completed, please try again later".to_string()
        }
    }
}

/// Convenience type alias for Result with LoyaltyError
pub type Result<T> = std::result::Result<T, LoyaltyError>;
