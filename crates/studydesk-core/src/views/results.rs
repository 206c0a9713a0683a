use std::collections::BTreeMap;

use serde::Serialize;

use crate::entity::{Record, TestResult};
use crate::quiz::{QuizStats, SubjectStats};

/// Count, rounded average and best score per subject.
pub fn subject_stats(results: &[Record<TestResult>]) -> BTreeMap<String, SubjectStats> {
    QuizStats::from_records(results).subjects
}

/// The first `n` results of a newest-first snapshot.
pub fn recent_results(results: &[Record<TestResult>], n: usize) -> Vec<Record<TestResult>> {
    results.iter().take(n).cloned().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        match score {
            s if s >= 80 => ScoreBand::High,
            s if s >= 60 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }
}

/// `m:ss`
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use studydesk_store::DocId;

    #[rstest]
    #[case(100, ScoreBand::High)]
    #[case(80, ScoreBand::High)]
    #[case(79, ScoreBand::Medium)]
    #[case(60, ScoreBand::Medium)]
    #[case(59, ScoreBand::Low)]
    #[case(0, ScoreBand::Low)]
    fn score_bands(#[case] score: u8, #[case] band: ScoreBand) {
        assert_eq!(ScoreBand::of(score), band);
    }

    #[rstest]
    #[case(0, "0:00")]
    #[case(9, "0:09")]
    #[case(95, "1:35")]
    #[case(3600, "60:00")]
    fn durations(#[case] seconds: u64, #[case] expected: &str) {
        assert_eq!(format_duration(seconds), expected);
    }

    #[test]
    fn stats_and_recent() {
        let results: Vec<_> = [("Civil", 4), ("Civil", 2), ("Penal", 5)]
            .iter()
            .map(|(s, c)| Record {
                id: DocId::new_v4(),
                created: Utc::now(),
                modified: Utc::now(),
                data: TestResult::from_answers(*s, *c, 5, 30).unwrap(),
            })
            .collect();
        let stats = subject_stats(&results);
        assert_eq!(stats["Civil"].count, 2);
        assert_eq!(stats["Civil"].average_score, 60);
        assert_eq!(stats["Penal"].best_score, 100);
        assert_eq!(recent_results(&results, 2).len(), 2);
    }
}
