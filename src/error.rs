//! Error types for Chaos Clicker
//!
//! Gameplay never fails; only configuration IO and validation do.

use thiserror::Error;

/// The main error type for Chaos Clicker operations
#[derive(Debug, Error)]
pub enum ChaosError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

/// Result type alias for Chaos Clicker operations
pub type Result<T> = std::result::Result<T, ChaosError>;
