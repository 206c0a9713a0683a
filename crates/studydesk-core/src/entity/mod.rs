//! Entity kinds mirrored from the document store
//!
//! Each kind is a plain serde struct plus a patch type. Conversion to and
//! from store payloads goes through `serde_json`, so field names on the wire
//! follow the `#[serde]` attributes of each struct.

mod calendar_event;
mod note;
mod study_plan;
mod support_ticket;
mod test_result;

pub use calendar_event::{CalendarEvent, CalendarEventPatch, EventKind};
pub use note::{Note, NotePatch};
pub use study_plan::{PlanStatus, Priority, StudyPlan, StudyPlanPatch};
pub use support_ticket::{SupportTicket, SupportTicketPatch, TicketStatus};
pub use test_result::{score_percent, TestResult, TestResultPatch};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use studydesk_store::{user_collection, CollectionPath, DocId, Document, Payload, Value};

use crate::error::{DataError, Result};

/// Global collection holding every user's quiz results.
pub const QUIZZES_COLLECTION: &str = "quizzes";

/// Payload field that scopes global-collection documents to their owner.
pub const OWNER_FIELD: &str = "userId";

/// The five mirrored entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Note,
    StudyPlan,
    CalendarEvent,
    TestResult,
    SupportTicket,
}

/// Where documents of a kind live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `users/{uid}/{name}`
    PerUser(&'static str),
    /// One shared collection filtered by `userId`
    Global(&'static str),
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Note,
        EntityKind::StudyPlan,
        EntityKind::CalendarEvent,
        EntityKind::TestResult,
        EntityKind::SupportTicket,
    ];

    pub fn scope(self) -> Scope {
        match self {
            EntityKind::Note => Scope::PerUser("notes"),
            EntityKind::StudyPlan => Scope::PerUser("studyPlans"),
            EntityKind::CalendarEvent => Scope::PerUser("events"),
            EntityKind::SupportTicket => Scope::PerUser("supportTickets"),
            EntityKind::TestResult => Scope::Global(QUIZZES_COLLECTION),
        }
    }

    /// Field the kind is loaded by, newest first.
    pub fn order_field(self) -> &'static str {
        match self {
            EntityKind::Note => "modified",
            EntityKind::CalendarEvent => "payload.date",
            EntityKind::StudyPlan | EntityKind::TestResult | EntityKind::SupportTicket => {
                "created"
            }
        }
    }

    pub fn collection_for(self, user_id: &str) -> CollectionPath {
        match self.scope() {
            Scope::PerUser(name) => user_collection(user_id, name),
            Scope::Global(name) => name.to_string(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Note => "note",
            EntityKind::StudyPlan => "study plan",
            EntityKind::CalendarEvent => "calendar event",
            EntityKind::TestResult => "test result",
            EntityKind::SupportTicket => "support ticket",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A record kind that the mirror cache can hold.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    /// Partial update; `None` fields are left untouched.
    type Patch: Serialize + Clone + std::fmt::Debug + Send + Sync;

    const KIND: EntityKind;

    /// Form-level validation, run before any remote call.
    fn validate(&self) -> Result<()>;

    fn validate_patch(_patch: &Self::Patch) -> Result<()> {
        Ok(())
    }

    /// Fill in fields derived from others before a patch is written.
    fn normalize_patch(_patch: &mut Self::Patch) {}

    /// Fill in fields a new record always starts with.
    fn prepare_new(&mut self) {}
}

/// A mirrored entity with its store-assigned id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<E> {
    pub id: DocId,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub data: E,
}

impl<E: Entity> Record<E> {
    pub fn from_document(doc: &Document) -> Result<Self> {
        Ok(Self {
            id: doc.id,
            created: doc.created,
            modified: doc.modified,
            data: from_payload(&doc.payload)?,
        })
    }

    /// Merge a patch payload into this record's data.
    pub(crate) fn merge(&self, patch: &Payload, at: DateTime<Utc>) -> Result<Self> {
        let mut payload = to_payload(&self.data)?;
        payload.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(Self {
            id: self.id,
            created: self.created,
            modified: at,
            data: from_payload(&payload)?,
        })
    }
}

/// Serialize a struct into a store payload.
pub fn to_payload<T: Serialize>(value: &T) -> Result<Payload> {
    match Value::from(serde_json::to_value(value)?) {
        Value::Object(map) => Ok(map),
        other => Err(DataError::Decode(format!(
            "expected an object payload, got {:?}",
            other
        ))),
    }
}

/// Deserialize a store payload into a struct. Unknown fields are ignored.
pub fn from_payload<T: DeserializeOwned>(payload: &Payload) -> Result<T> {
    let json = serde_json::Value::from(Value::Object(payload.clone()));
    Ok(serde_json::from_value(json)?)
}

pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DataError::validation(format!("{} is required", field)));
    }
    Ok(())
}

pub(crate) fn require_patch(field: &str, value: &Option<String>) -> Result<()> {
    match value {
        Some(v) => require(field, v),
        None => Ok(()),
    }
}
