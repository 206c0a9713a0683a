use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use studydesk_store::DocId;

use crate::config::DashboardConfig;
use crate::entity::{CalendarEvent, Note, PlanStatus, Record, StudyPlan};

/// Events dated within `[today, today + window_days]`, soonest first.
pub fn upcoming_events(
    events: &[Record<CalendarEvent>],
    today: NaiveDate,
    window_days: i64,
) -> Vec<Record<CalendarEvent>> {
    let until = Duration::try_days(window_days)
        .and_then(|d| today.checked_add_signed(d))
        .unwrap_or(NaiveDate::MAX);
    let mut upcoming: Vec<_> = events
        .iter()
        .filter(|e| e.data.date >= today && e.data.date <= until)
        .cloned()
        .collect();
    upcoming.sort_by_key(|e| e.data.starts_at());
    upcoming
}

/// Notes touched in the last `days` days, newest first.
pub fn recent_notes(notes: &[Record<Note>], now: DateTime<Utc>, days: i64) -> Vec<Record<Note>> {
    let since = Duration::try_days(days)
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut recent: Vec<_> = notes.iter().filter(|n| n.modified >= since).cloned().collect();
    recent.sort_by(|a, b| b.modified.cmp(&a.modified));
    recent
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyGoals {
    pub total: usize,
    pub completed: usize,
}

/// Plans due in the month of `today`.
pub fn monthly_goals(plans: &[Record<StudyPlan>], today: NaiveDate) -> MonthlyGoals {
    let this_month = plans
        .iter()
        .filter(|p| p.data.due_date.year() == today.year() && p.data.due_date.month() == today.month());
    let mut goals = MonthlyGoals::default();
    for plan in this_month {
        goals.total += 1;
        if plan.data.status == PlanStatus::Done {
            goals.completed += 1;
        }
    }
    goals
}

/// Rounded mean progress; 0 with no plans.
pub fn overall_progress(plans: &[Record<StudyPlan>]) -> u8 {
    if plans.is_empty() {
        return 0;
    }
    let sum: u64 = plans.iter().map(|p| u64::from(p.data.progress)).sum();
    (sum as f64 / plans.len() as f64).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Event,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub id: DocId,
    pub title: String,
    pub detail: String,
    pub at: NaiveDateTime,
}

/// The first `per_source` upcoming events and recent notes, merged newest
/// first and cut to `limit`.
pub fn recent_activities(
    upcoming: &[Record<CalendarEvent>],
    recent: &[Record<Note>],
    per_source: usize,
    limit: usize,
) -> Vec<Activity> {
    let events = upcoming.iter().take(per_source).map(|e| Activity {
        kind: ActivityKind::Event,
        id: e.id,
        title: e.data.title.clone(),
        detail: format!("Event on {}", e.data.date.format("%d/%m/%Y")),
        at: e.data.starts_at(),
    });
    let notes = recent.iter().take(per_source).map(|n| Activity {
        kind: ActivityKind::Note,
        id: n.id,
        title: n.data.title.clone(),
        detail: format!("Note in {}", n.data.subject),
        at: n.modified.naive_utc(),
    });
    let mut activities: Vec<Activity> = events.chain(notes).collect();
    activities.sort_by(|a, b| b.at.cmp(&a.at));
    activities.truncate(limit);
    activities
}

/// Everything the dashboard shows, computed in one pass over snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub upcoming: Vec<Record<CalendarEvent>>,
    pub recent_notes: Vec<Record<Note>>,
    pub goals: MonthlyGoals,
    pub overall_progress: u8,
    pub activities: Vec<Activity>,
}

impl Dashboard {
    pub fn build(
        events: &[Record<CalendarEvent>],
        notes: &[Record<Note>],
        plans: &[Record<StudyPlan>],
        now: DateTime<Utc>,
        config: &DashboardConfig,
    ) -> Self {
        let today = now.date_naive();
        let upcoming = upcoming_events(events, today, config.upcoming_window_days);
        let recent = recent_notes(notes, now, config.recent_notes_days);
        let activities = recent_activities(
            &upcoming,
            &recent,
            config.activity_sources,
            config.activity_limit,
        );
        Self {
            goals: monthly_goals(plans, today),
            overall_progress: overall_progress(plans),
            upcoming,
            recent_notes: recent,
            activities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EventKind;
    use chrono::{NaiveTime, TimeZone};
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn event(title: &str, date: NaiveDate, hour: u32) -> Record<CalendarEvent> {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        Record {
            id: DocId::new_v4(),
            created: at,
            modified: at,
            data: CalendarEvent::new(
                title,
                date,
                NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                EventKind::Class,
            ),
        }
    }

    fn note(title: &str, modified: DateTime<Utc>) -> Record<Note> {
        Record {
            id: DocId::new_v4(),
            created: modified,
            modified,
            data: Note::new(title, "Civil", "x"),
        }
    }

    fn plan(due: NaiveDate, progress: u8) -> Record<StudyPlan> {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        Record {
            id: DocId::new_v4(),
            created: at,
            modified: at,
            data: StudyPlan::new("p", "Civil", due).with_progress(progress),
        }
    }

    #[rstest]
    #[case(10, true)]
    #[case(17, true)]
    #[case(18, false)]
    #[case(9, false)]
    fn upcoming_window_is_inclusive(#[case] d: u32, #[case] expected: bool) {
        let events = vec![event("e", day(d), 9)];
        assert_eq!(!upcoming_events(&events, day(10), 7).is_empty(), expected);
    }

    #[test]
    fn oversized_windows_saturate() {
        let events = vec![event("e", day(30), 9)];
        assert_eq!(upcoming_events(&events, day(10), i64::MAX).len(), 1);
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let notes = vec![note("old", now - Duration::days(4000))];
        assert_eq!(recent_notes(&notes, now, 100_000_000_000).len(), 1);
    }

    #[test]
    fn upcoming_sorted_by_date_then_time() {
        let events = vec![event("c", day(12), 8), event("b", day(11), 15), event("a", day(11), 9)];
        let titles: Vec<_> = upcoming_events(&events, day(10), 7)
            .into_iter()
            .map(|e| e.data.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn recent_notes_newest_first() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let notes = vec![
            note("old", now - Duration::days(8)),
            note("mid", now - Duration::days(3)),
            note("new", now - Duration::hours(1)),
        ];
        let titles: Vec<_> = recent_notes(&notes, now, 7)
            .into_iter()
            .map(|n| n.data.title)
            .collect();
        assert_eq!(titles, vec!["new", "mid"]);
    }

    #[test]
    fn goals_and_progress() {
        let plans = vec![
            plan(day(20), 100),
            plan(day(25), 40),
            plan(NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(), 25),
        ];
        assert_eq!(
            monthly_goals(&plans, day(18)),
            MonthlyGoals { total: 2, completed: 1 }
        );
        // (100 + 40 + 25) / 3 = 55
        assert_eq!(overall_progress(&plans), 55);
        assert_eq!(overall_progress(&[]), 0);
    }

    #[test]
    fn activities_merge_and_truncate() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let upcoming = vec![event("e1", day(19), 9), event("e2", day(20), 9), event("e3", day(21), 9)];
        let recent = vec![note("n1", now), note("n2", now - Duration::days(1))];
        let activities = recent_activities(&upcoming, &recent, 2, 3);
        let titles: Vec<_> = activities.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["e2", "e1", "n1"]);
    }

    #[test]
    fn dashboard_uses_config_windows() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let events = vec![event("e", day(25), 9)];
        let notes = vec![note("n", now)];
        let dash = Dashboard::build(&events, &notes, &[], now, &DashboardConfig::default());
        assert_eq!(dash.upcoming.len(), 1);
        assert_eq!(dash.recent_notes.len(), 1);
        assert_eq!(dash.activities.len(), 2);
        assert_eq!(dash.overall_progress, 0);
    }
}
