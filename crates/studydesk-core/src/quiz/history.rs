use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::{debug, error, warn};

use studydesk_store::{DocId, DocQuery, Document, DocumentStore, NewDocument, Predicate};

use super::QuizStats;
use crate::entity::{to_payload, Entity, Record, TestResult, OWNER_FIELD, QUIZZES_COLLECTION};
use crate::error::{DataError, Result};
use crate::identity::UserIdentity;

/// Store-backed queries over the shared `quizzes` collection.
#[derive(Clone)]
pub struct QuizHistory {
    store: Arc<dyn DocumentStore>,
}

impl QuizHistory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn owned_by(user: &UserIdentity) -> DocQuery {
        DocQuery::collection(QUIZZES_COLLECTION).filter(Predicate::eq(OWNER_FIELD, user.id.as_str()))
    }

    fn run(&self, query: &DocQuery) -> Result<Vec<Record<TestResult>>> {
        let docs = self.store.query(query).map_err(|e| {
            error!("Failed to query test results: {}", e);
            DataError::Store(e)
        })?;
        Ok(decode_all(&docs))
    }

    /// Persist a finished test for `user`.
    pub fn save(&self, user: &UserIdentity, result: &TestResult) -> Result<Record<TestResult>> {
        result.validate()?;
        let mut payload = to_payload(result)?;
        payload.insert(OWNER_FIELD.to_string(), user.id.as_str().into());
        let at = Utc::now().trunc_subsecs(3);
        let id = self
            .store
            .create(QUIZZES_COLLECTION, NewDocument::new(payload, at))
            .map_err(|e| {
                error!("Failed to save test result: {}", e);
                DataError::Store(e)
            })?;
        debug!("Saved test result {} for {}", id, user.id);
        Ok(Record {
            id,
            created: at,
            modified: at,
            data: result.clone(),
        })
    }

    /// Every result of `user`, newest first.
    pub fn results(&self, user: &UserIdentity) -> Result<Vec<Record<TestResult>>> {
        self.run(&Self::owned_by(user).order_by("created", false))
    }

    pub fn stats(&self, user: &UserIdentity) -> Result<QuizStats> {
        Ok(QuizStats::from_records(&self.run(&Self::owned_by(user))?))
    }

    /// Highest scores first; ties broken by recency.
    pub fn recent_best(&self, user: &UserIdentity, limit: usize) -> Result<Vec<Record<TestResult>>> {
        self.run(
            &Self::owned_by(user)
                .order_by("payload.score", false)
                .order_by("created", false)
                .limit(limit),
        )
    }

    pub fn by_subject(&self, user: &UserIdentity, subject: &str) -> Result<Vec<Record<TestResult>>> {
        self.run(
            &Self::owned_by(user)
                .filter(Predicate::eq("subject", subject))
                .order_by("created", false),
        )
    }

    /// Delete one of `user`'s results. Another user's result is `NotFound`.
    pub fn delete(&self, user: &UserIdentity, id: DocId) -> Result<()> {
        let doc = self.store.get(QUIZZES_COLLECTION, id).map_err(|e| {
            error!("Failed to fetch test result {}: {}", id, e);
            DataError::Store(e)
        })?;
        let owned = doc
            .and_then(|d| d.field(OWNER_FIELD))
            .is_some_and(|owner| owner.as_str() == Some(user.id.as_str()));
        if !owned {
            return Err(DataError::NotFound(id));
        }
        self.store.delete(QUIZZES_COLLECTION, id).map_err(|e| {
            error!("Failed to delete test result {}: {}", id, e);
            DataError::Store(e)
        })
    }
}

fn decode_all(docs: &[Document]) -> Vec<Record<TestResult>> {
    docs.iter()
        .filter_map(|doc| match Record::<TestResult>::from_document(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping undecodable test result {}: {}", doc.id, e);
                None
            }
        })
        .collect()
}
