/// Error types for cartwise
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for cartwise operations
#[derive(Error, Debug)]
pub enum CartError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No shopping item with this id
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Caller passed something the store refuses (zero quantity, unknown season, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for cartwise operations
pub type Result<T> = std::result::Result<T, CartError>;

/// Convert CartError to a user-friendly error message
impl CartError {
    pub fn user_message(&self) -> String {
        match self {
            CartError::Database(e) => {
                format!("Could not reach your shopping list. Please try again. Details: {}", e)
            }
            CartError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            CartError::ItemNotFound(id) => {
                format!("No item with id {} on your list", id)
            }
            CartError::InvalidInput(reason) => {
                format!("Invalid input: {}", reason)
            }
            CartError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            CartError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            CartError::Generic(msg) => msg.clone(),
        }
    }
}
