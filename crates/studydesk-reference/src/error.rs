use thiserror::Error;

use studydesk_store::StoreError;

pub type Result<T> = std::result::Result<T, ReferenceError>;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ReferenceError {
    fn from(err: serde_json::Error) -> Self {
        ReferenceError::Decode(err.to_string())
    }
}
