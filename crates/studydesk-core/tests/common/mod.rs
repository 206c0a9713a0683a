//! Shared fixtures for studydesk-core integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use studydesk_core::{
    CalendarEvent, EventKind, Note, StudyConfig, StudyData, StudyPlan, UserIdentity,
};
use studydesk_store::{MemoryDocumentStore, NewDocument, Payload, Value};

pub fn ana() -> UserIdentity {
    UserIdentity::new("u-ana", "Ana", "ana@example.com")
}

pub fn bia() -> UserIdentity {
    UserIdentity::new("u-bia", "Bia", "bia@example.com")
}

/// A signed-in context over an in-memory store the test can inspect.
pub fn signed_in() -> (Arc<MemoryDocumentStore>, StudyData) {
    let store = Arc::new(MemoryDocumentStore::new());
    let data = StudyData::new(store.clone(), StudyConfig::default());
    let report = data
        .set_identity(Some(ana()))
        .expect("set identity");
    assert!(report.is_complete());
    (store, data)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub fn note(title: &str, subject: &str) -> Note {
    Note::new(title, subject, format!("Conteúdo de {}", title))
}

pub fn plan(title: &str, due: NaiveDate) -> StudyPlan {
    StudyPlan::new(title, "Civil", due)
}

pub fn event(title: &str, on: NaiveDate, at: NaiveTime) -> CalendarEvent {
    CalendarEvent::new(title, on, at, EventKind::Exam)
}

/// Seed `n` questions for `subject`, alternating between periods "1" and "2".
pub fn seed_questions(store: &MemoryDocumentStore, subject: &str, n: usize) {
    use studydesk_store::DocumentStore;

    for i in 0..n {
        let mut payload = Payload::new();
        payload.insert("subjectId".into(), Value::from(subject));
        payload.insert("q".into(), Value::from(format!("{} #{}", subject, i)));
        payload.insert(
            "opts".into(),
            Value::Array(vec!["A".into(), "B".into(), "C".into(), "D".into()]),
        );
        payload.insert("a".into(), Value::from((i % 4) as i64));
        payload.insert("periodo".into(), Value::from(if i % 2 == 0 { "1" } else { "2" }));
        store
            .create("questions", NewDocument::new(payload, Utc::now()))
            .expect("seed question");
    }
}
