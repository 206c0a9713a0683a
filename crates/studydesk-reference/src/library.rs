use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, warn};

use studydesk_store::{DocId, DocQuery, Document, DocumentStore, Predicate, Value};

use crate::document::{LegalDocument, LegalKind};
use crate::error::{ReferenceError, Result};

pub const LEGISLATION_COLLECTION: &str = "legislation";

/// Summary of the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub total_documents: usize,
    pub by_kind: BTreeMap<LegalKind, usize>,
    pub total_sections: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

pub struct ReferenceLibrary {
    store: Arc<dyn DocumentStore>,
}

impl ReferenceLibrary {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn fetch(&self, query: DocQuery) -> Result<Vec<LegalDocument>> {
        let docs = self.store.query(&query).map_err(|e| {
            error!("Failed to query legislation: {}", e);
            ReferenceError::Store(e)
        })?;
        let mut out = Vec::with_capacity(docs.len());
        for doc in &docs {
            match decode(doc) {
                Ok(d) => out.push(d),
                Err(e) => warn!("Skipping undecodable legal document {}: {}", doc.id, e),
            }
        }
        Ok(out)
    }

    fn by_title() -> DocQuery {
        DocQuery::collection(LEGISLATION_COLLECTION).order_by("titulo", true)
    }

    /// Every document, ordered by title.
    pub fn all(&self) -> Result<Vec<LegalDocument>> {
        self.fetch(Self::by_title())
    }

    pub fn get(&self, id: DocId) -> Result<Option<LegalDocument>> {
        let doc = self
            .store
            .get(LEGISLATION_COLLECTION, id)
            .map_err(ReferenceError::Store)?;
        doc.as_ref().map(decode).transpose()
    }

    /// Case-insensitive search over title, reference, content and keywords.
    /// A blank term returns everything.
    pub fn search(&self, term: &str) -> Result<Vec<LegalDocument>> {
        let needle = term.trim().to_lowercase();
        let all = self.all()?;
        if needle.is_empty() {
            return Ok(all);
        }
        let hits: Vec<_> = all.into_iter().filter(|d| d.matches(&needle)).collect();
        debug!("Search {:?} matched {} documents", term, hits.len());
        Ok(hits)
    }

    /// Documents of one kind; `None` returns everything.
    pub fn by_kind(&self, kind: Option<LegalKind>) -> Result<Vec<LegalDocument>> {
        match kind {
            None => self.all(),
            Some(LegalKind::Other) => Ok(self
                .all()?
                .into_iter()
                .filter(|d| d.kind == LegalKind::Other)
                .collect()),
            Some(kind) => self.fetch(Self::by_title().filter(Predicate::Eq(
                "tipo".to_string(),
                Value::from(kind.key()),
            ))),
        }
    }

    pub fn stats(&self) -> Result<LibraryStats> {
        let docs = self.all()?;
        let mut stats = LibraryStats {
            total_documents: docs.len(),
            ..Default::default()
        };
        for doc in &docs {
            *stats.by_kind.entry(doc.kind).or_insert(0) += 1;
            stats.total_sections += doc.sections.len();
            let stamp = doc.updated.or(doc.created);
            if stamp > stats.last_updated {
                stats.last_updated = stamp;
            }
        }
        Ok(stats)
    }
}

fn decode(doc: &Document) -> Result<LegalDocument> {
    let json = serde_json::Value::from(Value::Object(doc.payload.clone()));
    let mut legal: LegalDocument = serde_json::from_value(json)?;
    legal.id = doc.id;
    Ok(legal)
}
