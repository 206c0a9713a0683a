//! Local mirror cache over one remote collection
//!
//! `MirrorCache<E>` keeps an in-memory list of records for the signed-in
//! user. Local state only changes after the remote write is confirmed; a
//! failed call leaves the list exactly as it was.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, error, warn};

use studydesk_store::{
    CollectionPath, DocId, DocQuery, DocumentStore, FieldMutation, NewDocument, Predicate,
    StoreError,
};

use crate::entity::{to_payload, Entity, Record, Scope, OWNER_FIELD};
use crate::error::{DataError, Result};
use crate::identity::UserIdentity;

/// Asks the user before a destructive action.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Mirror of one entity kind for the attached user.
pub struct MirrorCache<E: Entity> {
    store: Arc<dyn DocumentStore>,
    owner: RwLock<Option<UserIdentity>>,
    records: Mutex<Vec<Record<E>>>,
    inflight: Mutex<HashMap<DocId, Arc<Mutex<()>>>>,
}

impl<E: Entity> std::fmt::Debug for MirrorCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorCache")
            .field("kind", &E::KIND)
            .field("len", &self.len())
            .finish()
    }
}

// Timestamps are kept at millisecond precision so that what the cache
// holds equals what any backend hands back on the next load.
fn stamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

impl<E: Entity> MirrorCache<E> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            owner: RwLock::new(None),
            records: Mutex::new(Vec::new()),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Bind the cache to a user. Switching users drops the old list.
    pub fn attach(&self, user: UserIdentity) -> Result<()> {
        let mut owner = self.owner.write()?;
        let switched = owner.as_ref().map(|u| u.id != user.id).unwrap_or(true);
        *owner = Some(user);
        if switched {
            self.records.lock()?.clear();
        }
        Ok(())
    }

    /// Forget the user and everything mirrored for them.
    pub fn detach(&self) -> Result<()> {
        *self.owner.write()? = None;
        self.clear()
    }

    pub fn clear(&self) -> Result<()> {
        self.records.lock()?.clear();
        Ok(())
    }

    pub fn owner(&self) -> Option<UserIdentity> {
        self.owner.read().ok().and_then(|o| o.clone())
    }

    fn require_owner(&self) -> Result<UserIdentity> {
        self.owner.read()?.clone().ok_or(DataError::NotSignedIn)
    }

    fn still_owned_by(&self, user: &UserIdentity) -> Result<bool> {
        Ok(self.owner.read()?.as_ref().map(|u| u.id == user.id) == Some(true))
    }

    fn collection(user: &UserIdentity) -> CollectionPath {
        E::KIND.collection_for(&user.id)
    }

    fn remote_failure(&self, op: &str, err: StoreError) -> DataError {
        error!("Failed to {} {}: {}", op, E::KIND, err);
        DataError::Store(err)
    }

    /// Replace the local list with everything the store holds for the
    /// attached user, newest first. Returns the number of records loaded.
    pub fn load(&self) -> Result<usize> {
        let user = self.require_owner()?;
        let mut query = DocQuery::collection(Self::collection(&user))
            .order_by(E::KIND.order_field(), false)
            .order_by("created", false);
        if let Scope::Global(_) = E::KIND.scope() {
            query = query.filter(Predicate::eq(OWNER_FIELD, user.id.as_str()));
        }

        let docs = self
            .store
            .query(&query)
            .map_err(|e| self.remote_failure("load", e))?;

        let mut loaded = Vec::with_capacity(docs.len());
        for doc in &docs {
            match Record::<E>::from_document(doc) {
                Ok(record) => loaded.push(record),
                Err(e) => warn!("Skipping undecodable {} {}: {}", E::KIND, doc.id, e),
            }
        }

        // The user may have signed out while the query was running.
        if !self.still_owned_by(&user)? {
            debug!("Discarding {} load for detached user", E::KIND);
            return Ok(0);
        }

        let count = loaded.len();
        *self.records.lock()? = loaded;
        debug!("Loaded {} {} records", count, E::KIND);
        Ok(count)
    }

    /// Create a record remotely, then prepend it locally.
    pub fn add(&self, mut data: E) -> Result<Record<E>> {
        let user = self.require_owner()?;
        data.validate()?;
        data.prepare_new();

        let mut payload = to_payload(&data)?;
        if let Scope::Global(_) = E::KIND.scope() {
            payload.insert(OWNER_FIELD.to_string(), user.id.as_str().into());
        }

        let at = stamp();
        let id = self
            .store
            .create(&Self::collection(&user), NewDocument::new(payload, at))
            .map_err(|e| self.remote_failure("add", e))?;

        let record = Record {
            id,
            created: at,
            modified: at,
            data,
        };
        if self.still_owned_by(&user)? {
            self.records.lock()?.insert(0, record.clone());
        }
        debug!("Added {} {}", E::KIND, id);
        Ok(record)
    }

    /// Apply a partial update remotely, then merge it into the local record
    /// in place.
    pub fn update(&self, id: DocId, mut patch: E::Patch) -> Result<Record<E>> {
        let user = self.require_owner()?;
        E::validate_patch(&patch)?;
        E::normalize_patch(&mut patch);
        let payload = to_payload(&patch)?;

        self.single_flight(id, || {
            let current = self.get(id).ok_or(DataError::NotFound(id))?;
            let at = stamp();
            let merged = current.merge(&payload, at)?;

            let mut mutations = FieldMutation::set_all(&payload);
            mutations.push(FieldMutation::SetModified(at));
            self.store
                .update(&Self::collection(&user), id, mutations)
                .map_err(|e| self.remote_failure("update", e))?;

            let mut records = self.records.lock()?;
            match records.iter_mut().find(|r| r.id == id) {
                Some(slot) => *slot = merged.clone(),
                None => return Err(DataError::NotFound(id)),
            }
            debug!("Updated {} {}", E::KIND, id);
            Ok(merged)
        })
    }

    /// Delete remotely, then drop the local record.
    pub fn delete(&self, id: DocId) -> Result<()> {
        let user = self.require_owner()?;
        self.single_flight(id, || {
            if self.get(id).is_none() {
                return Err(DataError::NotFound(id));
            }
            self.store
                .delete(&Self::collection(&user), id)
                .map_err(|e| self.remote_failure("delete", e))?;
            self.records.lock()?.retain(|r| r.id != id);
            debug!("Deleted {} {}", E::KIND, id);
            Ok(())
        })
    }

    /// Delete after the prompt agrees. Returns `false` when declined; no
    /// remote call is made in that case.
    pub fn delete_confirmed(&self, id: DocId, prompt: &dyn ConfirmPrompt) -> Result<bool> {
        let message = format!("Delete this {}?", E::KIND);
        if !prompt.confirm(&message) {
            return Ok(false);
        }
        self.delete(id)?;
        Ok(true)
    }

    pub fn snapshot(&self) -> Vec<Record<E>> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn get(&self, id: DocId) -> Option<Record<E>> {
        self.records
            .lock()
            .ok()
            .and_then(|r| r.iter().find(|rec| rec.id == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` while holding the lock for `id`. Mutations on one id never
    /// interleave between their remote write and local merge.
    fn single_flight<T>(&self, id: DocId, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let slot = {
            let mut inflight = self.inflight.lock()?;
            inflight.entry(id).or_default().clone()
        };

        let result = {
            let _guard = slot.lock()?;
            f()
        };

        let mut inflight = self.inflight.lock()?;
        // Map entry plus our handle: nobody else is waiting.
        if Arc::strong_count(&slot) == 2 {
            inflight.remove(&id);
        }
        result
    }

    #[cfg(test)]
    fn inflight_len(&self) -> usize {
        self.inflight.lock().map(|m| m.len()).unwrap_or(0)
    }
}
