use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{DocId, Document, NewDocument, Payload, Value};
use crate::query::DocQuery;

/// Partial update applied to a stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldMutation {
    SetPayload(String, Value),
    RemovePayload(String),
    SetModified(DateTime<Utc>),
}

impl FieldMutation {
    /// One `SetPayload` per entry of a patch map.
    pub fn set_all(patch: &Payload) -> Vec<FieldMutation> {
        patch
            .iter()
            .map(|(k, v)| FieldMutation::SetPayload(k.clone(), v.clone()))
            .collect()
    }

    /// Apply this mutation to an in-memory document.
    pub fn apply(&self, doc: &mut Document) {
        match self {
            FieldMutation::SetPayload(field, value) => {
                doc.payload.insert(field.clone(), value.clone());
            }
            FieldMutation::RemovePayload(field) => {
                doc.payload.remove(field);
            }
            FieldMutation::SetModified(at) => doc.modified = *at,
        }
    }
}

/// The trait that every document store backend implements.
///
/// Calls block until the backend answers; there is no timeout layer.
pub trait DocumentStore: Send + Sync {
    /// Create a document in a collection. The store assigns the id.
    fn create(&self, collection: &str, doc: NewDocument) -> Result<DocId, StoreError>;

    /// Get a document by id.
    fn get(&self, collection: &str, id: DocId) -> Result<Option<Document>, StoreError>;

    /// Apply mutations to an existing document.
    fn update(
        &self,
        collection: &str,
        id: DocId,
        mutations: Vec<FieldMutation>,
    ) -> Result<(), StoreError>;

    /// Delete a document by id.
    fn delete(&self, collection: &str, id: DocId) -> Result<(), StoreError>;

    /// Query documents matching predicates, sorted and paginated.
    fn query(&self, q: &DocQuery) -> Result<Vec<Document>, StoreError>;

    /// Count documents matching a query without fetching them.
    fn count(&self, q: &DocQuery) -> Result<usize, StoreError>;
}

/// Errors from the document store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
