//! Unified application error type.
//! All modules (storage, core, cli, db) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Local database
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Value for '{key}' is {len} characters long, the storage limit is {limit}")]
    CapacityExceeded {
        key: String,
        len: usize,
        limit: usize,
    },

    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),

    // ---------------------------
    // Timer logic
    // ---------------------------
    #[error("{0}")]
    NotFound(String),

    #[error("Current timer points to a missing track ({0})")]
    InconsistentPointer(String),

    #[error("{0}")]
    MissingContext(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Errors the caller must see as a failed operation.
    ///
    /// Capacity, pointer and backend errors have already been surfaced to the
    /// user (alert or log) and leave the stored data consistent enough to go on.
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self,
            AppError::CapacityExceeded { .. }
                | AppError::InconsistentPointer(_)
                | AppError::BackendUnavailable(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
