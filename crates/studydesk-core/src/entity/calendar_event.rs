use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{require, require_patch, Entity, EntityKind};
use crate::error::Result;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Class,
    Exam,
    Study,
    Deadline,
}

/// A dated calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    #[serde(default)]
    pub description: String,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate, time: NaiveTime, kind: EventKind) -> Self {
        Self {
            title: title.into(),
            date,
            time,
            kind,
            description: String::new(),
        }
    }

    /// Absolute ordering key.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for CalendarEvent {
    type Patch = CalendarEventPatch;
    const KIND: EntityKind = EntityKind::CalendarEvent;

    fn validate(&self) -> Result<()> {
        require("title", &self.title)
    }

    fn validate_patch(patch: &CalendarEventPatch) -> Result<()> {
        require_patch("title", &patch.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_combines_date_and_time() {
        let ev = CalendarEvent::new(
            "Prova OAB",
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            EventKind::Exam,
        );
        assert_eq!(ev.starts_at().to_string(), "2026-10-20 09:30:00");
    }

    #[test]
    fn kind_serialized_as_type() {
        let ev = CalendarEvent::new(
            "Entrega",
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
            EventKind::Deadline,
        );
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "deadline");
        assert_eq!(json["date"], "2026-10-20");
    }
}
