//! Error types for document operations

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by the document arena
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("unknown node id {0}")]
    UnknownNode(NodeId),

    #[error("parent of '{0}' does not exist")]
    MissingParent(String),

    #[error("inconsistent document data: {0}")]
    Inconsistent(String),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, CoreError>;
