use std::sync::Mutex;

use uuid::Uuid;

use crate::document::{DocId, Document, NewDocument};
use crate::query::DocQuery;
use crate::store::{DocumentStore, FieldMutation, StoreError};

/// Number of calls each operation has received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub creates: usize,
    pub gets: usize,
    pub updates: usize,
    pub deletes: usize,
    pub queries: usize,
}

impl CallCounts {
    pub fn writes(&self) -> usize {
        self.creates + self.updates + self.deletes
    }
}

#[derive(Default)]
struct State {
    docs: Vec<Document>,
    calls: CallCounts,
    read_failure: Option<StoreError>,
    write_failure: Option<StoreError>,
}

/// In-process document store.
///
/// Stands in for the hosted backend in tests and local runs. Failures can be
/// injected for reads and writes separately; every call is counted.
#[derive(Default)]
pub struct MemoryDocumentStore {
    state: Mutex<State>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read (`get`, `query`, `count`) fail.
    pub fn fail_reads(&self, error: Option<StoreError>) {
        if let Ok(mut state) = self.state.lock() {
            state.read_failure = error;
        }
    }

    /// Make every subsequent write (`create`, `update`, `delete`) fail.
    pub fn fail_writes(&self, error: Option<StoreError>) {
        if let Ok(mut state) = self.state.lock() {
            state.write_failure = error;
        }
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().map(|s| s.calls).unwrap_or_default()
    }

    /// Total number of stored documents across all collections.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

fn check(failure: &Option<StoreError>) -> Result<(), StoreError> {
    match failure {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn create(&self, collection: &str, doc: NewDocument) -> Result<DocId, StoreError> {
        let mut state = self.lock()?;
        state.calls.creates += 1;
        check(&state.write_failure)?;
        let id = Uuid::new_v4();
        state.docs.push(Document {
            id,
            collection: collection.to_string(),
            payload: doc.payload,
            created: doc.created,
            modified: doc.modified,
        });
        Ok(id)
    }

    fn get(&self, collection: &str, id: DocId) -> Result<Option<Document>, StoreError> {
        let mut state = self.lock()?;
        state.calls.gets += 1;
        check(&state.read_failure)?;
        Ok(state
            .docs
            .iter()
            .find(|d| d.id == id && d.collection == collection)
            .cloned())
    }

    fn update(
        &self,
        collection: &str,
        id: DocId,
        mutations: Vec<FieldMutation>,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.calls.updates += 1;
        check(&state.write_failure)?;
        let doc = state
            .docs
            .iter_mut()
            .find(|d| d.id == id && d.collection == collection)
            .ok_or(StoreError::NotFound(id))?;
        for m in &mutations {
            m.apply(doc);
        }
        Ok(())
    }

    fn delete(&self, collection: &str, id: DocId) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.calls.deletes += 1;
        check(&state.write_failure)?;
        let before = state.docs.len();
        state
            .docs
            .retain(|d| !(d.id == id && d.collection == collection));
        if state.docs.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn query(&self, q: &DocQuery) -> Result<Vec<Document>, StoreError> {
        let mut state = self.lock()?;
        state.calls.queries += 1;
        check(&state.read_failure)?;
        Ok(q.apply(&state.docs))
    }

    fn count(&self, q: &DocQuery) -> Result<usize, StoreError> {
        let mut state = self.lock()?;
        state.calls.queries += 1;
        check(&state.read_failure)?;
        Ok(state.docs.iter().filter(|d| q.matches(d)).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Payload, Value};
    use crate::query::Predicate;
    use chrono::Utc;

    fn new_doc(title: &str) -> NewDocument {
        let mut payload = Payload::new();
        payload.insert("title".into(), Value::String(title.into()));
        NewDocument::new(payload, Utc::now())
    }

    #[test]
    fn create_and_get_round_trip() {
        let store = MemoryDocumentStore::new();
        let id = store.create("users/u1/notes", new_doc("Súmulas")).unwrap();
        let got = store.get("users/u1/notes", id).unwrap().unwrap();
        assert_eq!(got.id, id);
        assert_eq!(got.payload.get("title"), Some(&Value::from("Súmulas")));
    }

    #[test]
    fn collections_are_isolated() {
        let store = MemoryDocumentStore::new();
        let id = store.create("users/u1/notes", new_doc("Mine")).unwrap();
        assert!(store.get("users/u2/notes", id).unwrap().is_none());
        assert!(matches!(
            store.delete("users/u2/notes", id),
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn injected_write_failure_leaves_data_untouched() {
        let store = MemoryDocumentStore::new();
        let id = store.create("c", new_doc("Keep")).unwrap();
        store.fail_writes(Some(StoreError::PermissionDenied("rules".into())));

        assert!(store.create("c", new_doc("Nope")).is_err());
        assert!(store
            .update("c", id, vec![FieldMutation::RemovePayload("title".into())])
            .is_err());
        assert!(store.delete("c", id).is_err());
        assert_eq!(store.len(), 1);

        store.fail_writes(None);
        let got = store.get("c", id).unwrap().unwrap();
        assert_eq!(got.payload.get("title"), Some(&Value::from("Keep")));
        assert_eq!(store.calls().writes(), 4);
    }

    #[test]
    fn injected_read_failure() {
        let store = MemoryDocumentStore::new();
        store.fail_reads(Some(StoreError::Unavailable("offline".into())));
        assert!(store.query(&DocQuery::collection("c")).is_err());
        assert!(store.count(&DocQuery::collection("c")).is_err());
    }

    #[test]
    fn count_matches_query() {
        let store = MemoryDocumentStore::new();
        for title in ["a", "b", "a"] {
            store.create("c", new_doc(title)).unwrap();
        }
        let q = DocQuery::collection("c").filter(Predicate::eq("title", "a"));
        assert_eq!(store.count(&q).unwrap(), 2);
        assert_eq!(store.query(&q).unwrap().len(), 2);
    }

    #[test]
    fn update_nonexistent_fails() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update("c", Uuid::new_v4(), vec![FieldMutation::SetModified(Utc::now())])
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
