//! Error types for stagehand operations

use stagehand_core::CoreError;
use thiserror::Error;

/// Main error type for stagehand operations
#[derive(Error, Debug)]
pub enum StageError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no active document")]
    NoActiveDocument,

    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("scope '{0}' not found")]
    TargetNotFound(String),

    #[error("failed to attach '{asset_path}' to '{target}': {message}")]
    AttachError {
        asset_path: String,
        target: String,
        message: String,
    },

    #[error("document error: {0}")]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl StageError {
    /// Conditions the user can fix and retry without restarting anything
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StageError::InvalidArgument(_) | StageError::NotFound(_) | StageError::TargetNotFound(_)
        )
    }
}

/// Result type alias for stagehand operations
pub type Result<T> = std::result::Result<T, StageError>;
