use serde::{Deserialize, Serialize};

use super::{require, Entity, EntityKind};
use crate::error::{DataError, Result};

/// `round(100 * correct / total)`.
pub fn score_percent(correct: u32, total: u32) -> Result<u8> {
    if total == 0 {
        return Err(DataError::Quiz("a test needs at least one question".into()));
    }
    if correct > total {
        return Err(DataError::Quiz(format!(
            "{} correct answers out of {} questions",
            correct, total
        )));
    }
    Ok(((correct as f64 / total as f64) * 100.0).round() as u8)
}

/// Outcome of one finished quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub subject: String,
    pub score: u8,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[serde(rename = "duration", default)]
    pub duration_seconds: u64,
}

impl TestResult {
    /// Build a result, computing the score from the answer counts.
    pub fn from_answers(
        subject: impl Into<String>,
        correct_answers: u32,
        total_questions: u32,
        duration_seconds: u64,
    ) -> Result<Self> {
        Ok(Self {
            subject: subject.into(),
            score: score_percent(correct_answers, total_questions)?,
            total_questions,
            correct_answers,
            duration_seconds,
        })
    }
}

/// Results are corrected only by subject; the counts are immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResultPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Entity for TestResult {
    type Patch = TestResultPatch;
    const KIND: EntityKind = EntityKind::TestResult;

    fn validate(&self) -> Result<()> {
        require("subject", &self.subject)?;
        let expected = score_percent(self.correct_answers, self.total_questions)
            .map_err(|e| DataError::validation(e.to_string()))?;
        if self.score != expected {
            return Err(DataError::validation(format!(
                "score {} does not match {}/{} answers",
                self.score, self.correct_answers, self.total_questions
            )));
        }
        Ok(())
    }

    fn validate_patch(patch: &TestResultPatch) -> Result<()> {
        super::require_patch("subject", &patch.subject)
    }
}
