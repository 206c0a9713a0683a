//! Derived views over cache snapshots
//!
//! Every function here is pure: it takes a snapshot (`&[Record<E>]`) plus
//! the reference instant and returns a fresh value. Nothing is cached.

pub mod calendar;
pub mod dashboard;
pub mod notebook;
pub mod planning;
pub mod results;

pub use calendar::{events_on, kind_counts, next_events};
pub use dashboard::{
    monthly_goals, overall_progress, recent_activities, recent_notes, upcoming_events, Activity,
    ActivityKind, Dashboard, MonthlyGoals,
};
pub use notebook::{filter_notes, subjects};
pub use planning::{is_overdue, plan_summary, PlanSummary};
pub use results::{format_duration, recent_results, subject_stats, ScoreBand};
