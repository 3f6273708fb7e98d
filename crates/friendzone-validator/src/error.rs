//! Validator error types

use thiserror::Error;

/// Hard failures during validation
///
/// These are system faults, not validation outcomes: a candidate that breaks
/// a rule produces [`crate::ValidationErrors`], while an unreachable store
/// produces one of these.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Store error during validation
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
