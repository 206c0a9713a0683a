//! Quiz results: history queries, statistics and the active-test session

mod history;
mod session;

pub use history::QuizHistory;
pub use session::{Advance, AnswerRecord, Question, QuizOutcome, QuizSession};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Record, TestResult};

/// Per-subject aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub count: usize,
    pub total_score: u64,
    pub best_score: u8,
    pub average_score: u8,
}

/// Aggregate over every result of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    pub total_tests: usize,
    pub average_score: u8,
    pub best_score: u8,
    pub subjects: BTreeMap<String, SubjectStats>,
}

fn rounded_mean(total: u64, count: usize) -> u8 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as u8
}

impl QuizStats {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a TestResult>,
    {
        let mut stats = QuizStats::default();
        let mut total: u64 = 0;
        for result in results {
            stats.total_tests += 1;
            total += u64::from(result.score);
            stats.best_score = stats.best_score.max(result.score);

            let entry = stats.subjects.entry(result.subject.clone()).or_default();
            entry.count += 1;
            entry.total_score += u64::from(result.score);
            entry.best_score = entry.best_score.max(result.score);
        }
        stats.average_score = rounded_mean(total, stats.total_tests);
        for entry in stats.subjects.values_mut() {
            entry.average_score = rounded_mean(entry.total_score, entry.count);
        }
        stats
    }

    pub fn from_records(records: &[Record<TestResult>]) -> Self {
        Self::from_results(records.iter().map(|r| &r.data))
    }
}
