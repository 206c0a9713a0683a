//! Read-only question bank
//!
//! Subjects live in `subjects`; each question in `questions` carries the id
//! of its subject in `subjectId` and, optionally, the course period it
//! belongs to.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use studydesk_store::{DocId, DocQuery, Document, DocumentStore, Predicate};

use crate::config::QuizConfig;
use crate::entity::from_payload;
use crate::error::{DataError, Result};
use crate::quiz::Question;

pub const SUBJECTS_COLLECTION: &str = "subjects";
pub const QUESTIONS_COLLECTION: &str = "questions";
pub const SUBJECT_FIELD: &str = "subjectId";
pub const PERIOD_FIELD: &str = "periodo";

/// A subject that questions can be drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(skip)]
    pub id: String,
    pub name: String,
}

/// How many questions a subject has, overall and per period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInfo {
    pub questions_count: usize,
    pub questions_by_period: BTreeMap<String, usize>,
}

impl SubjectInfo {
    pub fn periods(&self) -> impl Iterator<Item = &str> {
        self.questions_by_period.keys().map(String::as_str)
    }
}

pub struct QuestionBank {
    store: Arc<dyn DocumentStore>,
    config: QuizConfig,
}

impl QuestionBank {
    pub fn new(store: Arc<dyn DocumentStore>, config: QuizConfig) -> Self {
        Self { store, config }
    }

    fn fetch(&self, query: &DocQuery) -> Result<Vec<Document>> {
        self.store.query(query).map_err(|e| {
            error!("Failed to query {}: {}", query.collection, e);
            DataError::Store(e)
        })
    }

    /// Every subject, ordered by name.
    pub fn subjects(&self) -> Result<Vec<Subject>> {
        let docs = self.fetch(&DocQuery::collection(SUBJECTS_COLLECTION).order_by("name", true))?;
        let mut subjects = Vec::with_capacity(docs.len());
        for doc in docs {
            match from_payload::<Subject>(&doc.payload) {
                Ok(mut subject) => {
                    subject.id = doc.id.to_string();
                    subjects.push(subject);
                }
                Err(e) => warn!("Skipping undecodable subject {}: {}", doc.id, e),
            }
        }
        Ok(subjects)
    }

    pub fn subject_info(&self, subject: &str) -> Result<SubjectInfo> {
        let docs = self.fetch(
            &DocQuery::collection(QUESTIONS_COLLECTION).filter(Predicate::eq(SUBJECT_FIELD, subject)),
        )?;
        let mut info = SubjectInfo {
            questions_count: docs.len(),
            ..Default::default()
        };
        for doc in &docs {
            if let Some(period) = doc.payload.get(PERIOD_FIELD).and_then(|v| v.as_str()) {
                *info.questions_by_period.entry(period.to_string()).or_insert(0) += 1;
            }
        }
        Ok(info)
    }

    /// Draw `count` questions at random, without replacement, optionally
    /// restricted to one period.
    pub fn random_questions(
        &self,
        subject: &str,
        count: usize,
        period: Option<&str>,
    ) -> Result<Vec<Question>> {
        self.random_questions_with(&mut rand::thread_rng(), subject, count, period)
    }

    pub fn random_questions_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        subject: &str,
        count: usize,
        period: Option<&str>,
    ) -> Result<Vec<Question>> {
        if !self.config.question_counts.contains(&count) {
            return Err(DataError::validation(format!(
                "question count must be one of {:?}, got {}",
                self.config.question_counts, count
            )));
        }

        let mut query =
            DocQuery::collection(QUESTIONS_COLLECTION).filter(Predicate::eq(SUBJECT_FIELD, subject));
        if let Some(period) = period {
            query = query.filter(Predicate::eq(PERIOD_FIELD, period));
        }
        let docs = self.fetch(&query)?;

        let mut pool: Vec<(DocId, Question)> = Vec::with_capacity(docs.len());
        for doc in docs {
            match from_payload::<Question>(&doc.payload) {
                Ok(q) if q.answer < q.options.len() => pool.push((doc.id, q)),
                Ok(_) => warn!("Skipping question {} with out-of-range answer", doc.id),
                Err(e) => warn!("Skipping undecodable question {}: {}", doc.id, e),
            }
        }
        if pool.is_empty() {
            return Err(DataError::NoQuestions);
        }

        let picked: Vec<Question> = pool
            .choose_multiple(rng, count)
            .map(|(_, q)| q.clone())
            .collect();
        debug!(
            "Drew {} of {} questions for subject {}",
            picked.len(),
            pool.len(),
            subject
        );
        Ok(picked)
    }
}
