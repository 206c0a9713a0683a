use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::document::{CollectionPath, Document, Value};

/// A query against one collection of the document store.
///
/// The mirror cache only needs a handful of shapes:
/// - load a kind → `DocQuery::collection(path).order_by("modified", false)`
/// - quiz history → `.filter(Predicate::Eq("userId", uid))`
/// - best results → `.order_by("score", false).order_by("created", false).limit(5)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocQuery {
    pub collection: CollectionPath,
    pub predicates: Vec<Predicate>,
    pub sort: Vec<SortDescriptor>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Filter predicate for document queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Eq(String, Value),
    Neq(String, Value),
    Gt(String, Value),
    Lt(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    /// Case-insensitive substring match on a string field.
    Contains(String, String),
    In(String, Vec<Value>),

    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

/// Sort descriptor for query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortDescriptor {
    /// Field path, e.g. "created", "modified", "payload.date".
    pub field: String,
    pub ascending: bool,
}

impl DocQuery {
    pub fn collection(path: impl Into<CollectionPath>) -> Self {
        Self {
            collection: path.into(),
            ..Default::default()
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort.push(SortDescriptor {
            field: field.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether a document satisfies every predicate of this query.
    pub fn matches(&self, doc: &Document) -> bool {
        doc.collection == self.collection && self.predicates.iter().all(|p| p.matches(doc))
    }

    /// Order two documents by this query's sort descriptors.
    ///
    /// Missing fields sort before present ones.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        for s in &self.sort {
            let ord = match (a.field(&s.field), b.field(&s.field)) {
                (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            let ord = if s.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Filter, sort and paginate documents in memory.
    pub fn apply<'a, I>(&self, docs: I) -> Vec<Document>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut matched: Vec<Document> =
            docs.into_iter().filter(|d| self.matches(d)).cloned().collect();
        matched.sort_by(|a, b| self.compare(a, b));
        let skip = self.offset.unwrap_or(0);
        let take = self.limit.unwrap_or(usize::MAX);
        matched.into_iter().skip(skip).take(take).collect()
    }
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(field.into(), value.into())
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Predicate::Eq(f, v) => doc.field(f).as_ref() == Some(v),
            Predicate::Neq(f, v) => doc.field(f).as_ref() != Some(v),
            Predicate::Gt(f, v) => cmp_field(doc, f, v) == Some(Ordering::Greater),
            Predicate::Lt(f, v) => cmp_field(doc, f, v) == Some(Ordering::Less),
            Predicate::Gte(f, v) => matches!(
                cmp_field(doc, f, v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Predicate::Lte(f, v) => matches!(
                cmp_field(doc, f, v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Predicate::Contains(f, text) => match doc.field(f) {
                Some(Value::String(s)) => s.to_lowercase().contains(&text.to_lowercase()),
                _ => false,
            },
            Predicate::In(f, values) => match doc.field(f) {
                Some(v) => values.contains(&v),
                None => false,
            },
            Predicate::And(preds) => preds.iter().all(|p| p.matches(doc)),
            Predicate::Or(preds) => preds.iter().any(|p| p.matches(doc)),
            Predicate::Not(pred) => !pred.matches(doc),
        }
    }
}

fn cmp_field(doc: &Document, field: &str, value: &Value) -> Option<Ordering> {
    doc.field(field).and_then(|v| v.compare(value))
}
