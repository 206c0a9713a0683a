use serde::{Deserialize, Serialize};

use super::{require, require_patch, Entity, EntityKind};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

/// A message to the support desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub status: TicketStatus,
}

impl SupportTicket {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            status: TicketStatus::Open,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicketPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

impl Entity for SupportTicket {
    type Patch = SupportTicketPatch;
    const KIND: EntityKind = EntityKind::SupportTicket;

    fn validate(&self) -> Result<()> {
        require("subject", &self.subject)?;
        require("message", &self.message)
    }

    fn validate_patch(patch: &SupportTicketPatch) -> Result<()> {
        require_patch("message", &patch.message)
    }

    // New tickets are always open, whatever the caller passed.
    fn prepare_new(&mut self) {
        self.status = TicketStatus::Open;
    }
}
