use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::entity::{CalendarEvent, EventKind, Record};

/// Events on one day, by start time.
pub fn events_on(events: &[Record<CalendarEvent>], date: NaiveDate) -> Vec<Record<CalendarEvent>> {
    let mut on: Vec<_> = events.iter().filter(|e| e.data.date == date).cloned().collect();
    on.sort_by_key(|e| e.data.time);
    on
}

/// The first `n` events starting at or after `now`.
pub fn next_events(
    events: &[Record<CalendarEvent>],
    now: NaiveDateTime,
    n: usize,
) -> Vec<Record<CalendarEvent>> {
    let mut next: Vec<_> = events
        .iter()
        .filter(|e| e.data.starts_at() >= now)
        .cloned()
        .collect();
    next.sort_by_key(|e| e.data.starts_at());
    next.truncate(n);
    next
}

pub fn kind_counts(events: &[Record<CalendarEvent>]) -> BTreeMap<EventKind, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.data.kind).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone, Utc};
    use studydesk_store::DocId;

    fn event(date: NaiveDate, hm: (u32, u32), kind: EventKind) -> Record<CalendarEvent> {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        Record {
            id: DocId::new_v4(),
            created: at,
            modified: at,
            data: CalendarEvent::new(
                format!("{}h{}", hm.0, hm.1),
                date,
                NaiveTime::from_hms_opt(hm.0, hm.1, 0).unwrap(),
                kind,
            ),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn events_on_a_day_by_time() {
        let events = vec![
            event(day(18), (14, 0), EventKind::Class),
            event(day(19), (8, 0), EventKind::Exam),
            event(day(18), (9, 30), EventKind::Study),
        ];
        let titles: Vec<_> = events_on(&events, day(18))
            .into_iter()
            .map(|e| e.data.title)
            .collect();
        assert_eq!(titles, vec!["9h30", "14h0"]);
    }

    #[test]
    fn next_events_skip_past_ones() {
        let events = vec![
            event(day(18), (8, 0), EventKind::Class),
            event(day(18), (14, 0), EventKind::Class),
            event(day(20), (8, 0), EventKind::Exam),
            event(day(19), (8, 0), EventKind::Exam),
        ];
        let now = day(18).and_hms_opt(12, 0, 0).unwrap();
        let next = next_events(&events, now, 2);
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].data.date, day(18));
        assert_eq!(next[1].data.date, day(19));
    }

    #[test]
    fn counts_by_kind() {
        let events = vec![
            event(day(18), (8, 0), EventKind::Exam),
            event(day(19), (8, 0), EventKind::Exam),
            event(day(19), (9, 0), EventKind::Class),
        ];
        let counts = kind_counts(&events);
        assert_eq!(counts[&EventKind::Exam], 2);
        assert_eq!(counts[&EventKind::Class], 1);
        assert!(!counts.contains_key(&EventKind::Study));
    }
}
