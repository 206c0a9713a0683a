use serde::{Deserialize, Serialize};

use super::{require, require_patch, Entity, EntityKind};
use crate::error::Result;

/// A study note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub subject: String,
    pub content: String,
}

impl Note {
    pub fn new(
        title: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subject: subject.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl From<Note> for NotePatch {
    fn from(note: Note) -> Self {
        Self {
            title: Some(note.title),
            subject: Some(note.subject),
            content: Some(note.content),
        }
    }
}

impl Entity for Note {
    type Patch = NotePatch;
    const KIND: EntityKind = EntityKind::Note;

    fn validate(&self) -> Result<()> {
        require("title", &self.title)?;
        require("subject", &self.subject)?;
        require("content", &self.content)
    }

    fn validate_patch(patch: &NotePatch) -> Result<()> {
        require_patch("title", &patch.title)?;
        require_patch("subject", &patch.subject)?;
        require_patch("content", &patch.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_is_required() {
        assert!(Note::new("t", "s", "c").validate().is_ok());
        assert!(Note::new("", "s", "c").validate().is_err());
        assert!(Note::new("t", " ", "c").validate().is_err());
        assert!(Note::new("t", "s", "\n").validate().is_err());
    }

    #[test]
    fn patch_skips_absent_fields() {
        let patch = NotePatch {
            content: Some("novo".into()),
            ..Default::default()
        };
        let payload = super::super::to_payload(&patch).unwrap();
        assert_eq!(payload.len(), 1);
        assert!(payload.contains_key("content"));
    }
}
