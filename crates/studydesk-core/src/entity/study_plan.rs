use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use studydesk_store::DocId;

use super::{require, require_patch, Entity, EntityKind};
use crate::error::{DataError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Plan status. Always derived from progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl PlanStatus {
    /// 100 → done, 0 → pending, anything between → in progress.
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => PlanStatus::Pending,
            p if p >= 100 => PlanStatus::Done,
            _ => PlanStatus::InProgress,
        }
    }
}

/// A study goal with a due date and progress percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub title: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: PlanStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub linked_notes: BTreeSet<DocId>,
}

impl StudyPlan {
    pub fn new(title: impl Into<String>, subject: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            subject: subject.into(),
            description: String::new(),
            due_date,
            priority: Priority::default(),
            status: PlanStatus::Pending,
            progress: 0,
            linked_notes: BTreeSet::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress;
        self.status = PlanStatus::from_progress(progress);
        self
    }

    /// Overdue means not done and past its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != PlanStatus::Done && self.due_date < today
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_notes: Option<BTreeSet<DocId>>,
}

impl StudyPlanPatch {
    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }
}

fn check_progress(progress: u8) -> Result<()> {
    if progress > 100 {
        return Err(DataError::validation(format!(
            "progress must be between 0 and 100, got {}",
            progress
        )));
    }
    Ok(())
}

impl Entity for StudyPlan {
    type Patch = StudyPlanPatch;
    const KIND: EntityKind = EntityKind::StudyPlan;

    fn validate(&self) -> Result<()> {
        require("title", &self.title)?;
        check_progress(self.progress)
    }

    fn validate_patch(patch: &StudyPlanPatch) -> Result<()> {
        require_patch("title", &patch.title)?;
        match patch.progress {
            Some(p) => check_progress(p),
            None => Ok(()),
        }
    }

    /// Status is derived, never taken from the caller.
    fn normalize_patch(patch: &mut StudyPlanPatch) {
        patch.status = patch.progress.map(PlanStatus::from_progress);
    }

    fn prepare_new(&mut self) {
        self.status = PlanStatus::from_progress(self.progress);
    }
}
