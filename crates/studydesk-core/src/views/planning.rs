use chrono::NaiveDate;
use serde::Serialize;

use crate::entity::{PlanStatus, Record, StudyPlan};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub done: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub overdue: usize,
}

pub fn is_overdue(plan: &StudyPlan, today: NaiveDate) -> bool {
    plan.is_overdue(today)
}

pub fn plan_summary(plans: &[Record<StudyPlan>], today: NaiveDate) -> PlanSummary {
    let mut summary = PlanSummary::default();
    for plan in plans {
        match plan.data.status {
            PlanStatus::Done => summary.done += 1,
            PlanStatus::InProgress => summary.in_progress += 1,
            PlanStatus::Pending => summary.pending += 1,
        }
        if is_overdue(&plan.data, today) {
            summary.overdue += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studydesk_store::DocId;

    fn plan(due: NaiveDate, progress: u8) -> Record<StudyPlan> {
        let at = Utc::now();
        Record {
            id: DocId::new_v4(),
            created: at,
            modified: at,
            data: StudyPlan::new("p", "Civil", due).with_progress(progress),
        }
    }

    #[test]
    fn summary_counts() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let past = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let future = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let plans = vec![
            plan(past, 100),
            plan(past, 30),
            plan(future, 0),
            plan(today, 0),
        ];
        assert_eq!(
            plan_summary(&plans, today),
            PlanSummary {
                done: 1,
                in_progress: 1,
                pending: 2,
                overdue: 1,
            }
        );
    }
}
