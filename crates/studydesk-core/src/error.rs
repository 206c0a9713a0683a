//! Error types for studydesk-core

use thiserror::Error;

use studydesk_store::{DocId, StoreError};

use crate::config::ConfigError;

/// Result type alias for studydesk operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Main error type for data operations
///
/// Every failure that crosses the mirror-cache boundary is one of these;
/// nothing is allowed to panic past it.
#[derive(Error, Debug)]
pub enum DataError {
    /// No user identity is attached
    #[error("Not signed in")]
    NotSignedIn,

    /// A required field is empty or a value is out of range
    #[error("Validation error: {0}")]
    Validation(String),

    /// The record is not in the local mirror
    #[error("Not found: {0}")]
    NotFound(DocId),

    /// The remote store rejected or failed the call
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A stored document could not be decoded into an entity
    #[error("Decode error: {0}")]
    Decode(String),

    /// Quiz session misuse or impossible score input
    #[error("Quiz error: {0}")]
    Quiz(String),

    /// The question bank has nothing for the requested criteria
    #[error("No questions found for the selected criteria")]
    NoQuestions,

    /// Authentication collaborator failure
    #[error("Auth error: {0}")]
    Auth(String),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A lock was poisoned by a panicking thread
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Decode(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DataError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        DataError::Lock(err.to_string())
    }
}

impl DataError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        DataError::Validation(msg.into())
    }

    /// Whether the failure came from the remote store.
    pub fn is_remote(&self) -> bool {
        matches!(self, DataError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_convert_and_display() {
        let err: DataError = StoreError::Unavailable("offline".into()).into();
        assert!(err.is_remote());
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn validation_is_local() {
        let err = DataError::validation("title is required");
        assert!(!err.is_remote());
        assert_eq!(err.to_string(), "Validation error: title is required");
    }
}
