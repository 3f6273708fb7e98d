//! Error types for the CLI application.

use friendzone_validator::ValidationErrors;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] friendzone_store::StoreError),

    /// Validator failed to run (not a rule violation)
    #[error("Validator error: {0}")]
    Validator(#[from] friendzone_validator::ValidatorError),

    /// The candidate broke one or more rules
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// No person with this name
    #[error("No friend named '{0}'")]
    UnknownPerson(String),

    /// No friendship between the two persons
    #[error("{0} and {1} are not friends")]
    NotFriends(String, String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
